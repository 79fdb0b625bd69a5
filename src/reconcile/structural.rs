//! Additive merge of a regenerated tree into a persisted one.
//!
//! Used by the non-pruning strategy. The persisted tree is the base: nothing in
//! it is ever removed, incoming folders and requests are appended where their
//! key is new, and requests present on both sides absorb incoming metadata while
//! keeping their persisted body, URL and headers.

use crate::collection::key::{folder_key, request_item_key};
use crate::collection::model::{CollectionNode, CollectionTree, FolderNode, RequestItem};
use crate::reconcile::policy::{merge_group, merge_request};
use serde::Serialize;
use tracing::{debug, info};

const UNTITLED_FOLDER: &str = "Untitled";

/// What a structural merge changed in the persisted tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub added_requests: usize,
    pub added_folders: usize,
    pub merged_requests: usize,
}

/// Merge `incoming` into `existing` and return the combined tree.
pub fn merge_collections(
    existing: CollectionTree,
    incoming: &CollectionTree,
) -> (CollectionTree, MergeReport) {
    let mut merged = existing;
    merge_group(&merged, incoming).apply_to(&mut merged);

    let mut report = MergeReport::default();
    let root_name = if merged.info.name.is_empty() {
        "<root>".to_string()
    } else {
        merged.info.name.clone()
    };
    merge_items(&mut merged.item, &incoming.item, &root_name, &mut report);
    (merged, report)
}

fn merge_items(
    destination: &mut Vec<CollectionNode>,
    source: &[CollectionNode],
    parent: &str,
    report: &mut MergeReport,
) {
    for node in source {
        match node {
            CollectionNode::Request(request) => merge_request_into(destination, request, parent, report),
            CollectionNode::Folder(folder) => {
                let position = find_or_create_folder(destination, folder, report);
                if let CollectionNode::Folder(target) = &mut destination[position] {
                    merge_group(&*target, folder).apply_to(target);
                    let name = target.name.clone();
                    merge_items(&mut target.item, &folder.item, &name, report);
                }
            }
        }
    }
}

fn merge_request_into(
    destination: &mut Vec<CollectionNode>,
    request: &RequestItem,
    parent: &str,
    report: &mut MergeReport,
) {
    let key = request_item_key(request);
    let existing = destination.iter_mut().find_map(|node| match node {
        CollectionNode::Request(candidate) if request_item_key(candidate) == key => Some(candidate),
        _ => None,
    });

    match existing {
        Some(existing) => {
            merge_request(&*existing, request).apply_to(existing);
            report.merged_requests += 1;
            debug!(request = %key, parent, "Request already present, merged metadata");
        }
        None => {
            destination.push(CollectionNode::Request(request.clone()));
            report.added_requests += 1;
            info!(request = %display_name(request, &key), parent, "Adding request");
        }
    }
}

/// Position of the destination folder sharing `folder`'s key, appending one if needed.
fn find_or_create_folder(
    destination: &mut Vec<CollectionNode>,
    folder: &FolderNode,
    report: &mut MergeReport,
) -> usize {
    let name = if folder.name.is_empty() {
        UNTITLED_FOLDER
    } else {
        folder.name.as_str()
    };
    let key = folder_key(name);

    let position = destination.iter().position(|node| match node {
        CollectionNode::Folder(candidate) => folder_key(&candidate.name) == key,
        CollectionNode::Request(_) => false,
    });
    match position {
        Some(position) => position,
        None => {
            destination.push(CollectionNode::Folder(FolderNode {
                name: name.to_string(),
                extra: folder.extra.clone(),
                ..FolderNode::default()
            }));
            report.added_folders += 1;
            info!(folder = name, "Adding folder");
            destination.len() - 1
        }
    }
}

fn display_name<'r>(request: &'r RequestItem, key: &'r str) -> &'r str {
    if request.name.is_empty() {
        key
    } else {
        &request.name
    }
}
