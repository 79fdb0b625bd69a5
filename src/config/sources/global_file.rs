//! Per-user config file: `<config dir>/collection-sync/config.toml`.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Location of the global config file, if the platform has a config dir.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "collection-sync").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the global file as an optional source.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(match global_config_path() {
        Some(path) => builder.add_source(File::from(path).required(false)),
        None => builder,
    })
}
