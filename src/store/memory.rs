//! In-process document store.

use crate::collection::model::CollectionTree;
use crate::error::SyncError;
use crate::store::DocumentStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A recorded write.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Created { id: String },
    Replaced { id: String },
}

/// Keeps documents in memory; created documents get ids `memory-1`, `memory-2`, ...
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, CollectionTree>>,
    writes: RwLock<Vec<StoreWrite>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(id: &str, tree: CollectionTree) -> Self {
        let store = Self::new();
        store.documents.write().insert(id.to_string(), tree);
        store
    }

    pub fn get(&self, id: &str) -> Option<CollectionTree> {
        self.documents.read().get(id).cloned()
    }

    pub fn writes(&self) -> Vec<StoreWrite> {
        self.writes.read().clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn fetch(&self, id: &str) -> Result<Option<CollectionTree>, SyncError> {
        Ok(self.get(id))
    }

    async fn create(&self, tree: &CollectionTree) -> Result<(), SyncError> {
        let mut documents = self.documents.write();
        let id = format!("memory-{}", documents.len() + 1);
        documents.insert(id.clone(), tree.clone());
        self.writes.write().push(StoreWrite::Created { id });
        Ok(())
    }

    async fn replace(&self, id: &str, tree: &CollectionTree) -> Result<(), SyncError> {
        self.documents.write().insert(id.to_string(), tree.clone());
        self.writes.write().push(StoreWrite::Replaced { id: id.to_string() });
        Ok(())
    }
}
