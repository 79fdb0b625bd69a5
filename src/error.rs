//! Error types for collection reconciliation and its boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a sync run.
///
/// Data-shape anomalies in a collection (missing names, URLs or auth) are never
/// errors; they resolve to defaults during key derivation and merging.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to read source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid specification document {path}: {reason}")]
    InvalidSource { path: PathBuf, reason: String },

    #[error("Conversion failed for service {service}: {reason}")]
    ConversionFailed { service: String, reason: String },

    #[error("Document store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Fetch failed: {status} {body}")]
    FetchFailed { status: u16, body: String },

    #[error("{operation} failed: {status} {body}")]
    WriteFailed {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid collection document: {0}")]
    InvalidCollection(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::ConfigError(err.to_string())
    }
}

impl From<globset::Error> for SyncError {
    fn from(err: globset::Error) -> Self {
        SyncError::ConfigError(format!("Invalid source pattern: {}", err))
    }
}
