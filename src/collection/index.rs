//! Key lookups over a collection snapshot.

use crate::collection::key::{folder_key, request_item_key};
use crate::collection::model::{CollectionNode, CollectionTree, FolderNode, RequestItem};
use std::collections::HashMap;

/// Flattened key index over every depth of a tree.
///
/// Duplicate keys inside one tree are not deduplicated here: the last node
/// visited wins.
pub struct TreeIndex<'a> {
    requests_by_key: HashMap<String, &'a RequestItem>,
    folders_by_key: HashMap<String, &'a FolderNode>,
}

impl<'a> TreeIndex<'a> {
    pub fn build(tree: &'a CollectionTree) -> Self {
        let mut index = TreeIndex {
            requests_by_key: HashMap::new(),
            folders_by_key: HashMap::new(),
        };
        index.walk(&tree.item);
        index
    }

    fn walk(&mut self, items: &'a [CollectionNode]) {
        for node in items {
            match node {
                CollectionNode::Request(request) => {
                    self.requests_by_key.insert(request_item_key(request), request);
                }
                CollectionNode::Folder(folder) => {
                    self.folders_by_key.insert(folder_key(&folder.name), folder);
                    self.walk(&folder.item);
                }
            }
        }
    }

    pub fn request(&self, key: &str) -> Option<&'a RequestItem> {
        self.requests_by_key.get(key).copied()
    }

    pub fn folder(&self, key: &str) -> Option<&'a FolderNode> {
        self.folders_by_key.get(key).copied()
    }

    pub fn request_count(&self) -> usize {
        self.requests_by_key.len()
    }

    pub fn folder_count(&self) -> usize {
        self.folders_by_key.len()
    }
}

/// Direct-children view of one folder (or the collection root).
pub struct ScopedIndex<'a> {
    folders_by_key: HashMap<String, &'a FolderNode>,
}

impl<'a> ScopedIndex<'a> {
    pub fn of(items: &'a [CollectionNode]) -> Self {
        let folders_by_key = items
            .iter()
            .filter_map(CollectionNode::as_folder)
            .map(|folder| (folder_key(&folder.name), folder))
            .collect();
        ScopedIndex { folders_by_key }
    }

    pub fn folder(&self, key: &str) -> Option<&'a FolderNode> {
        self.folders_by_key.get(key).copied()
    }
}
