//! Collection Trees
//!
//! Document model for hierarchical API collections, the key derivation that
//! gives nodes an identity across independent regenerations, and key indexes
//! over a tree snapshot.

pub mod index;
pub mod key;
pub mod model;

pub use index::{ScopedIndex, TreeIndex};
pub use key::{canonical_url, folder_key, normalize, request_item_key, request_key};
pub use model::{
    CollectionInfo, CollectionNode, CollectionTree, EventEntry, EventScript, FolderNode,
    GroupMetadata, RequestItem, RequestSpec, RequestUrl, StructuredUrl, Variable,
    COLLECTION_SCHEMA,
};
