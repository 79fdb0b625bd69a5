//! CLI Tooling
//!
//! Command-line interface for collection sync. Every command is workspace
//! scoped; `execute` returns the text to print and leaves printing and exit
//! codes to the binary.

use crate::collection::model::CollectionTree;
use crate::config::{ConfigLoader, SyncConfig, SyncOptions};
use crate::error::SyncError;
use crate::logging::LoggingConfig;
use crate::reconcile::DiffReport;
use crate::source::{build_incoming, OpenApiConverter};
use crate::store::HttpDocumentStore;
use crate::sync::{reconcile, SyncMode, SyncOrchestrator, SyncReport};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Reconcile generated API collections with persisted ones
#[derive(Parser)]
#[command(name = "collection-sync")]
#[command(about = "Regenerate API collections from specifications without losing hand-written metadata")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces the global and workspace config files)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Shorthand for --log-level debug
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply logging flags on top of the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate from workspace sources and write to the document store
    Sync {
        /// Replace the persisted collection (default from config)
        #[arg(long, conflicts_with = "no_prune")]
        prune: bool,
        /// Merge into the persisted collection, removing nothing
        #[arg(long)]
        no_prune: bool,
        /// Fetch and reconcile but do not write
        #[arg(long)]
        dry_run: bool,
        /// Also write the payload to this file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Source glob relative to the workspace root
        #[arg(long)]
        pattern: Option<String>,
        /// Name used when the collection has to be created
        #[arg(long)]
        collection_name: Option<String>,
        /// Id of the persisted collection
        #[arg(long)]
        collection_uid: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Convert workspace sources into a collection without touching the store
    Build {
        /// Write the collection here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
        /// Source glob relative to the workspace root
        #[arg(long)]
        pattern: Option<String>,
    },
    /// List what the incoming collection no longer contains
    Diff {
        #[arg(long)]
        existing: PathBuf,
        #[arg(long)]
        incoming: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Reconcile two local collection files
    Merge {
        #[arg(long)]
        existing: PathBuf,
        #[arg(long)]
        incoming: PathBuf,
        /// replace (preserve metadata onto incoming) or merge (also keep everything existing)
        #[arg(long, default_value = "replace")]
        strategy: String,
        /// Write the payload here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// CLI context for command execution
pub struct CliContext {
    workspace_root: PathBuf,
    config: SyncConfig,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, SyncError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: SyncConfig) -> Self {
        CliContext {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        match command {
            Commands::Sync {
                prune,
                no_prune,
                dry_run,
                output,
                pattern,
                collection_name,
                collection_uid,
                format,
            } => {
                let mut config = self.config.clone();
                if *prune {
                    config.prune = true;
                }
                if *no_prune {
                    config.prune = false;
                }
                if let Some(pattern) = pattern {
                    config.source_glob = pattern.clone();
                }
                if let Some(name) = collection_name {
                    config.collection_name = name.clone();
                }
                if let Some(uid) = collection_uid {
                    config.store.collection_uid = Some(uid.clone());
                }
                check_format(format)?;

                let (api_key, uid) = config.store_credentials()?;
                let store =
                    HttpDocumentStore::new(&config.store.base_url, api_key, &config.collection_name)?;
                let converter = OpenApiConverter::new();
                let orchestrator = SyncOrchestrator::new(
                    config.options(),
                    self.workspace_root.clone(),
                    &converter,
                    &store,
                );
                let report = orchestrator.run(uid, *dry_run).await?;

                if let Some(path) = output {
                    write_collection(path, &report.payload)?;
                }
                if format == "json" {
                    Ok(serde_json::to_string_pretty(&report)?)
                } else {
                    Ok(format_sync_report(&report))
                }
            }
            Commands::Build { output, pattern } => {
                let options = self.options_with_pattern(pattern.as_deref());
                let converter = OpenApiConverter::new();
                let tree = build_incoming(
                    &self.workspace_root,
                    &options.source_glob,
                    &options.collection_name,
                    &converter,
                )
                .await?;
                match output {
                    Some(path) => {
                        write_collection(path, &tree)?;
                        Ok(format!(
                            "Wrote {} service folder(s) to {}",
                            tree.item.len(),
                            path.display()
                        ))
                    }
                    None => Ok(serde_json::to_string_pretty(&tree)?),
                }
            }
            Commands::Diff {
                existing,
                incoming,
                format,
            } => {
                check_format(format)?;
                let existing = self.read_collection(existing)?;
                let incoming = self.read_collection(incoming)?;
                let report = crate::reconcile::diff(&existing, &incoming);
                if format == "json" {
                    Ok(serde_json::to_string_pretty(&report)?)
                } else {
                    Ok(format_diff_report(&report))
                }
            }
            Commands::Merge {
                existing,
                incoming,
                strategy,
                output,
            } => {
                let mode = parse_strategy(strategy)?;
                let existing = self.read_collection(existing)?;
                let incoming = self.read_collection(incoming)?;
                let result = reconcile(existing, &incoming, mode);
                info!(
                    matched_requests = result.preserved.matched_requests,
                    matched_folders = result.preserved.matched_folders,
                    "Metadata preserved"
                );
                match output {
                    Some(path) => {
                        write_collection(path, &result.payload)?;
                        Ok(format!(
                            "Wrote {} collection to {} ({} request(s) and {} folder(s) kept their metadata)",
                            strategy,
                            path.display(),
                            result.preserved.matched_requests,
                            result.preserved.matched_folders
                        ))
                    }
                    None => Ok(serde_json::to_string_pretty(&result.payload)?),
                }
            }
        }
    }

    fn options_with_pattern(&self, pattern: Option<&str>) -> SyncOptions {
        let mut options = self.config.options();
        if let Some(pattern) = pattern {
            options.source_glob = pattern.to_string();
        }
        options
    }

    /// Relative paths resolve against the workspace root.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }

    fn read_collection(&self, path: &Path) -> Result<CollectionTree, SyncError> {
        let path = self.resolve(path);
        let text = fs::read_to_string(&path).map_err(|source| SyncError::SourceRead {
            path: path.clone(),
            source,
        })?;
        let document: Value = serde_json::from_str(&text)?;
        Ok(CollectionTree::from_document(
            document,
            &self.config.collection_name,
        )?)
    }
}

fn check_format(format: &str) -> Result<(), SyncError> {
    match format {
        "text" | "json" => Ok(()),
        other => Err(SyncError::ConfigError(format!(
            "Invalid format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn parse_strategy(strategy: &str) -> Result<SyncMode, SyncError> {
    match strategy {
        "replace" => Ok(SyncMode::Replace),
        "merge" => Ok(SyncMode::Merge),
        other => Err(SyncError::ConfigError(format!(
            "Invalid strategy: {} (must be 'replace' or 'merge')",
            other
        ))),
    }
}

fn write_collection(path: &Path, tree: &CollectionTree) -> Result<(), SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(tree)?)?;
    Ok(())
}

fn format_diff_report(report: &DiffReport) -> String {
    if report.is_empty() {
        return "No removals detected".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Kind", "Key"]);
    for key in &report.removed_folders {
        table.add_row(vec!["folder", key.as_str()]);
    }
    for key in &report.removed_requests {
        table.add_row(vec!["request", key.as_str()]);
    }
    table.to_string()
}

fn format_sync_report(report: &SyncReport) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Collection".to_string(), report.collection_uid.clone()]);
    table.add_row(vec!["Mode".to_string(), format!("{:?}", report.mode)]);
    table.add_row(vec!["Outcome".to_string(), format!("{:?}", report.outcome)]);
    table.add_row(vec!["Services".to_string(), report.services.to_string()]);
    table.add_row(vec![
        "Preserved".to_string(),
        format!(
            "{} request(s), {} folder(s)",
            report.preserved.matched_requests, report.preserved.matched_folders
        ),
    ]);
    if let Some(merged) = &report.merged {
        table.add_row(vec![
            "Added".to_string(),
            format!(
                "{} request(s), {} folder(s)",
                merged.added_requests, merged.added_folders
            ),
        ]);
    }
    table.add_row(vec![
        "Removed".to_string(),
        format!(
            "{} request(s), {} folder(s)",
            report.diff.removed_requests.len(),
            report.diff.removed_folders.len()
        ),
    ]);
    table.add_row(vec!["Duration".to_string(), format!("{} ms", report.duration_ms)]);
    table.to_string()
}
