//! Normalize specification documents before conversion.
//!
//! Swagger 2.0 documents are relabelled as OpenAPI 3.0.0 and a missing or
//! non-semver `info.version` is replaced, since the converter rejects both.

use crate::error::SyncError;
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::warn;

const DEFAULT_OPENAPI_VERSION: &str = "3.0.0";
const DEFAULT_INFO_VERSION: &str = "1.0.0";

/// Read and parse a specification document from disk.
pub fn load_document(path: &Path) -> Result<Value, SyncError> {
    let content = std::fs::read_to_string(path).map_err(|source| SyncError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| SyncError::InvalidSource {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Normalize a parsed document in place. `path` is only used for messages and
/// the fallback title.
pub fn normalize_document(document: &mut Value, path: &Path) -> Result<(), SyncError> {
    let file = path.display().to_string();
    let root = document
        .as_object_mut()
        .ok_or_else(|| SyncError::InvalidSource {
            path: path.to_path_buf(),
            reason: "document is not a JSON object".to_string(),
        })?;

    if root.remove("swagger").is_some() {
        warn!(file = %file, "Replacing swagger 2.0 marker with openapi {}", DEFAULT_OPENAPI_VERSION);
        root.insert("openapi".to_string(), json!(DEFAULT_OPENAPI_VERSION));
    }
    if !root.contains_key("openapi") {
        root.insert("openapi".to_string(), json!(DEFAULT_OPENAPI_VERSION));
    }

    if !root.get("info").map_or(false, Value::is_object) {
        root.insert("info".to_string(), Value::Object(Map::new()));
    }
    if let Some(info) = root.get_mut("info").and_then(Value::as_object_mut) {
        let version_ok = info
            .get("version")
            .and_then(Value::as_str)
            .map_or(false, is_semver_triplet);
        if !version_ok {
            warn!(file = %file, "Fixing info.version to {}", DEFAULT_INFO_VERSION);
            info.insert("version".to_string(), json!(DEFAULT_INFO_VERSION));
        }

        let has_title = info
            .get("title")
            .and_then(Value::as_str)
            .map_or(false, |title| !title.is_empty());
        if !has_title {
            let title = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.clone());
            info.insert("title".to_string(), json!(title));
        }
    }

    Ok(())
}

fn is_semver_triplet(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}
