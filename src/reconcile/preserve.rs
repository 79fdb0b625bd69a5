//! Carry user-authored metadata from a persisted tree onto a regenerated one.
//!
//! The incoming tree keeps its own structure. Every incoming node that matches
//! an existing node by key absorbs that node's events, variables and auth.
//! Requests match anywhere in the existing tree, so a request that moved between
//! folders keeps its scripts. Folders match their positional sibling first and
//! fall back to a global lookup, so renamed parents do not orphan their children.

use crate::collection::index::{ScopedIndex, TreeIndex};
use crate::collection::key::{folder_key, request_item_key};
use crate::collection::model::{CollectionNode, CollectionTree};
use crate::reconcile::policy::{merge_group, merge_request};
use serde::Serialize;
use tracing::debug;

/// Counts of incoming nodes that found an existing counterpart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PreserveReport {
    pub matched_requests: usize,
    pub matched_folders: usize,
}

/// Overlay existing metadata onto `incoming` in place.
///
/// Callers that still need the untouched incoming tree must pass a clone.
pub fn preserve_metadata(existing: &CollectionTree, incoming: &mut CollectionTree) -> PreserveReport {
    merge_group(existing, &*incoming).apply_to(incoming);

    let index = TreeIndex::build(existing);
    let mut report = PreserveReport::default();
    preserve_items(&mut incoming.item, Some(existing.item.as_slice()), &index, &mut report);

    debug!(
        matched_requests = report.matched_requests,
        matched_folders = report.matched_folders,
        "Preserved metadata from existing collection"
    );
    report
}

fn preserve_items<'a>(
    items: &mut [CollectionNode],
    paired: Option<&'a [CollectionNode]>,
    index: &TreeIndex<'a>,
    report: &mut PreserveReport,
) {
    let scope = paired.map(ScopedIndex::of);

    for node in items.iter_mut() {
        match node {
            CollectionNode::Request(request) => {
                if let Some(found) = index.request(&request_item_key(request)) {
                    merge_request(found, request).apply_to(request);
                    report.matched_requests += 1;
                }
            }
            CollectionNode::Folder(folder) => {
                let key = folder_key(&folder.name);
                let matched = scope
                    .as_ref()
                    .and_then(|scope| scope.folder(&key))
                    .or_else(|| index.folder(&key));

                match matched {
                    Some(found) => {
                        merge_group(found, &*folder).apply_to(folder);
                        report.matched_folders += 1;
                        preserve_items(&mut folder.item, Some(found.item.as_slice()), index, report);
                    }
                    None => preserve_items(&mut folder.item, None, index, report),
                }
            }
        }
    }
}
