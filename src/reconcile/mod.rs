//! Reconciliation
//!
//! Pairs a freshly generated collection with the persisted one. Metadata
//! policies decide how events, variables and auth combine; the preserver copies
//! persisted metadata onto regenerated nodes; the structural merger folds a
//! regenerated tree into the persisted one without deleting anything; the diff
//! reports what the regenerated tree no longer contains.

pub mod diff;
pub mod policy;
pub mod preserve;
pub mod structural;

pub use diff::{collect_keys, diff, DiffReport, NodeKeys};
pub use policy::{
    auth_is_configured, event_identity, merge_auth, merge_events, merge_group, merge_request,
    merge_variables,
};
pub use preserve::{preserve_metadata, PreserveReport};
pub use structural::{merge_collections, MergeReport};
