//! Configuration
//!
//! Layered run configuration: built-in defaults, then the global config file,
//! then the workspace config file, then `COLLECTION_SYNC_*` environment
//! variables. CLI flags are applied on top by the caller.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::SyncError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `COLLECTION_SYNC_STORE__API_KEY`.
pub const ENV_PREFIX: &str = "COLLECTION_SYNC";

/// Config file looked up in the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = "collection-sync.toml";

pub const DEFAULT_COLLECTION_NAME: &str = "API_COLLECTION";
pub const DEFAULT_SOURCE_GLOB: &str = "services/**/designtime/*_API.json";
pub const DEFAULT_STORE_BASE_URL: &str = "https://api.getpostman.com";

fn default_true() -> bool {
    true
}

fn default_collection_name() -> String {
    DEFAULT_COLLECTION_NAME.to_string()
}

fn default_source_glob() -> String {
    DEFAULT_SOURCE_GLOB.to_string()
}

fn default_base_url() -> String {
    DEFAULT_STORE_BASE_URL.to_string()
}

/// Full configuration for a sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Replace the persisted tree (true) or merge into it (false)
    #[serde(default = "default_true")]
    pub prune: bool,

    /// Name of the collection when one has to be created
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Glob, relative to the workspace root, selecting specification files
    #[serde(default = "default_source_glob")]
    pub source_glob: String,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            prune: default_true(),
            collection_name: default_collection_name(),
            source_glob: default_source_glob(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Document store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Id of the persisted collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_uid: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            collection_uid: None,
        }
    }
}

/// The options the orchestrator needs, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub prune: bool,
    pub collection_name: String,
    pub source_glob: String,
}

impl SyncConfig {
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            prune: self.prune,
            collection_name: self.collection_name.clone(),
            source_glob: self.source_glob.clone(),
        }
    }

    /// Store credentials required by `sync`: `(api_key, collection_uid)`.
    pub fn store_credentials(&self) -> Result<(&str, &str), SyncError> {
        fn present(value: &Option<String>) -> Option<&str> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != "REPLACE_ME")
        }

        let api_key = present(&self.store.api_key).ok_or_else(|| {
            SyncError::ConfigError(format!(
                "Missing store.api_key (set {}_STORE__API_KEY)",
                ENV_PREFIX
            ))
        })?;
        let uid = present(&self.store.collection_uid).ok_or_else(|| {
            SyncError::ConfigError(format!(
                "Missing store.collection_uid (set {}_STORE__COLLECTION_UID)",
                ENV_PREFIX
            ))
        })?;
        Ok((api_key, uid))
    }
}
