//! Sync
//!
//! One reconciliation run against a document store.

pub mod orchestrator;

pub use orchestrator::{reconcile, Reconciliation, SyncMode, SyncOrchestrator, SyncReport, WriteOutcome};
