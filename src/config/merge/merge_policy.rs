//! Built-in defaults, the lowest-precedence layer.

use crate::config::{DEFAULT_COLLECTION_NAME, DEFAULT_SOURCE_GLOB, DEFAULT_STORE_BASE_URL};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with defaults; later sources override key by key.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("prune", true)?
        .set_default("collection_name", DEFAULT_COLLECTION_NAME)?
        .set_default("source_glob", DEFAULT_SOURCE_GLOB)?
        .set_default("store.base_url", DEFAULT_STORE_BASE_URL)
}
