//! collection-sync
//!
//! Regenerates hierarchical API collections from specification documents and
//! reconciles them with a persisted collection. Requests and folders are matched
//! across regenerations by normalized keys, so scripts, variables and auth
//! written by hand survive a regeneration. Either the regenerated structure
//! replaces the persisted one, or it is merged in without deleting anything.

pub mod collection;
pub mod config;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod source;
pub mod store;
pub mod sync;
pub mod tooling;

pub use collection::{CollectionNode, CollectionTree, FolderNode, RequestItem};
pub use config::{ConfigLoader, SyncConfig, SyncOptions};
pub use error::SyncError;
pub use reconcile::{diff, merge_collections, preserve_metadata, DiffReport};
pub use store::{DocumentStore, HttpDocumentStore, MemoryDocumentStore};
pub use sync::{SyncMode, SyncOrchestrator, SyncReport};
