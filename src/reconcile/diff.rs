//! Removal report between a persisted and a regenerated tree.
//!
//! Informational only: neither tree is modified. In prune mode it lists what the
//! payload is about to drop; in merge mode it lists what is kept even though it
//! is no longer generated.

use crate::collection::key::{folder_key, request_item_key};
use crate::collection::model::{CollectionNode, CollectionTree};
use serde::Serialize;
use std::collections::HashSet;

/// Unique request and folder keys of a tree, in first-seen traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeKeys {
    pub requests: Vec<String>,
    pub folders: Vec<String>,
}

pub fn collect_keys(items: &[CollectionNode]) -> NodeKeys {
    let mut keys = NodeKeys::default();
    let mut seen = SeenKeys::default();
    collect_into(items, &mut keys, &mut seen);
    keys
}

/// Requests and folders dedup independently; a request key may spell a folder key.
#[derive(Default)]
struct SeenKeys {
    requests: HashSet<String>,
    folders: HashSet<String>,
}

fn collect_into(items: &[CollectionNode], keys: &mut NodeKeys, seen: &mut SeenKeys) {
    for node in items {
        match node {
            CollectionNode::Request(request) => {
                let key = request_item_key(request);
                if seen.requests.insert(key.clone()) {
                    keys.requests.push(key);
                }
            }
            CollectionNode::Folder(folder) => {
                let key = folder_key(&folder.name);
                if seen.folders.insert(key.clone()) {
                    keys.folders.push(key);
                }
                collect_into(&folder.item, keys, seen);
            }
        }
    }
}

/// Keys present in the existing tree but absent from the incoming one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub removed_requests: Vec<String>,
    pub removed_folders: Vec<String>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.removed_requests.is_empty() && self.removed_folders.is_empty()
    }
}

pub fn diff(existing: &CollectionTree, incoming: &CollectionTree) -> DiffReport {
    let existing_keys = collect_keys(&existing.item);
    let incoming_keys = collect_keys(&incoming.item);

    let missing = |ours: Vec<String>, theirs: &[String]| -> Vec<String> {
        let theirs: HashSet<&String> = theirs.iter().collect();
        ours.into_iter().filter(|key| !theirs.contains(key)).collect()
    };

    DiffReport {
        removed_requests: missing(existing_keys.requests, &incoming_keys.requests),
        removed_folders: missing(existing_keys.folders, &incoming_keys.folders),
    }
}
