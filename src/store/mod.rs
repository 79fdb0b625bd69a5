//! Document Store
//!
//! Boundary to wherever the persisted collection lives. A run fetches once and
//! writes once; durability and retries belong to the store itself.

pub mod http;
pub mod memory;

pub use http::HttpDocumentStore;
pub use memory::{MemoryDocumentStore, StoreWrite};

use crate::collection::model::CollectionTree;
use crate::error::SyncError;
use async_trait::async_trait;
use serde::Serialize;

/// Fetch-by-id and create/replace-by-id over collection documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `Ok(None)` when the store has no document under `id`.
    async fn fetch(&self, id: &str) -> Result<Option<CollectionTree>, SyncError>;
    async fn create(&self, tree: &CollectionTree) -> Result<(), SyncError>;
    async fn replace(&self, id: &str, tree: &CollectionTree) -> Result<(), SyncError>;
}

/// Wire envelope for writes: `{"collection": tree}`.
#[derive(Debug, Serialize)]
pub struct CollectionEnvelope<'a> {
    pub collection: &'a CollectionTree,
}
