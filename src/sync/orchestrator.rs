//! Sync Orchestrator
//!
//! Drives a run end to end: fetch the persisted tree, build the incoming tree
//! from workspace sources, report removals, preserve metadata, pick the payload
//! for the configured strategy and write it back. Every step runs in order and
//! the first error aborts the run before anything is written.

use crate::collection::model::CollectionTree;
use crate::config::SyncOptions;
use crate::error::SyncError;
use crate::reconcile::{diff, merge_collections, preserve_metadata, DiffReport, MergeReport, PreserveReport};
use crate::source::{build_incoming, SpecConverter};
use crate::store::DocumentStore;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Payload strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// The preserved incoming tree replaces the persisted one.
    Replace,
    /// The preserved incoming tree is merged into the persisted one; nothing is removed.
    Merge,
}

impl SyncMode {
    pub fn from_prune(prune: bool) -> Self {
        if prune {
            SyncMode::Replace
        } else {
            SyncMode::Merge
        }
    }
}

/// What happened to the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Created,
    Replaced,
    /// Dry run: the payload was computed but not written.
    Skipped,
}

/// Result of reconciling one existing/incoming pair.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub mode: SyncMode,
    pub payload: CollectionTree,
    pub diff: DiffReport,
    pub preserved: PreserveReport,
    /// Present in merge mode only.
    pub merged: Option<MergeReport>,
}

/// Diff, preserve and (in merge mode) structurally merge.
///
/// The incoming tree is left untouched; preservation runs on a copy.
pub fn reconcile(existing: CollectionTree, incoming: &CollectionTree, mode: SyncMode) -> Reconciliation {
    let removals = diff(&existing, incoming);
    log_removals(&removals);

    let mut preserved_tree = incoming.clone();
    let preserved = preserve_metadata(&existing, &mut preserved_tree);

    let (payload, merged) = match mode {
        SyncMode::Replace => (preserved_tree, None),
        SyncMode::Merge => {
            let (merged_tree, report) = merge_collections(existing, &preserved_tree);
            (merged_tree, Some(report))
        }
    };

    Reconciliation {
        mode,
        payload,
        diff: removals,
        preserved,
        merged,
    }
}

fn log_removals(report: &DiffReport) {
    if report.is_empty() {
        info!("No removals detected");
        return;
    }
    for key in &report.removed_folders {
        warn!(key = %key, "Folder no longer generated");
    }
    for key in &report.removed_requests {
        warn!(key = %key, "Request no longer generated");
    }
    info!(
        folders = report.removed_folders.len(),
        requests = report.removed_requests.len(),
        "Removals detected"
    );
}

/// Summary of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub collection_uid: String,
    pub mode: SyncMode,
    pub outcome: WriteOutcome,
    /// Service folders built from workspace sources
    pub services: usize,
    pub diff: DiffReport,
    pub preserved: PreserveReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged: Option<MergeReport>,
    /// RFC 3339 timestamp of run completion
    pub generated_at: String,
    pub duration_ms: u64,
    /// The tree written (or that would have been written)
    #[serde(skip)]
    pub payload: CollectionTree,
}

/// Runs syncs for one workspace against one store.
pub struct SyncOrchestrator<'a> {
    options: SyncOptions,
    workspace_root: PathBuf,
    converter: &'a dyn SpecConverter,
    store: &'a dyn DocumentStore,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        options: SyncOptions,
        workspace_root: impl Into<PathBuf>,
        converter: &'a dyn SpecConverter,
        store: &'a dyn DocumentStore,
    ) -> Self {
        SyncOrchestrator {
            options,
            workspace_root: workspace_root.into(),
            converter,
            store,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Reconcile the collection stored under `collection_uid` with the workspace sources.
    ///
    /// With `dry_run` the store is read but never written.
    pub async fn run(&self, collection_uid: &str, dry_run: bool) -> Result<SyncReport, SyncError> {
        let started = Instant::now();
        let mode = SyncMode::from_prune(self.options.prune);
        info!(collection_uid, ?mode, dry_run, "Starting sync");

        let fetched = self.store.fetch(collection_uid).await?;
        let found = fetched.is_some();
        let existing =
            fetched.unwrap_or_else(|| CollectionTree::empty(&self.options.collection_name));

        let incoming = build_incoming(
            &self.workspace_root,
            &self.options.source_glob,
            &self.options.collection_name,
            self.converter,
        )
        .await?;
        let services = incoming.item.len();

        let reconciliation = reconcile(existing, &incoming, mode);

        let outcome = if dry_run {
            info!("Dry run, skipping write");
            WriteOutcome::Skipped
        } else if found {
            self.store.replace(collection_uid, &reconciliation.payload).await?;
            info!(collection_uid, "Collection replaced");
            WriteOutcome::Replaced
        } else {
            self.store.create(&reconciliation.payload).await?;
            info!(name = %reconciliation.payload.info.name, "Collection created");
            WriteOutcome::Created
        };

        Ok(SyncReport {
            collection_uid: collection_uid.to_string(),
            mode,
            outcome,
            services,
            diff: reconciliation.diff,
            preserved: reconciliation.preserved,
            merged: reconciliation.merged,
            generated_at: chrono::Utc::now().to_rfc3339(),
            duration_ms: started.elapsed().as_millis() as u64,
            payload: reconciliation.payload,
        })
    }
}
