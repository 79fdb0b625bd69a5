//! Metadata merge policies.
//!
//! Each policy is level-agnostic and takes the existing (persisted) side first.
//! Existing entries are never removed or rewritten; incoming entries are only
//! added when their identity is new.

use crate::collection::model::{EventEntry, GroupMetadata, RequestItem, Variable};
use serde_json::Value;
use std::collections::HashSet;

/// Identity of an event: `listen:id`, or `listen:type:hash(exec)` for scripts without id.
pub fn event_identity(event: &EventEntry) -> String {
    match &event.script.id {
        Some(id) => format!("{}:{}", event.listen, id),
        None => format!(
            "{}:{}:{}",
            event.listen,
            event.script.script_type.as_deref().unwrap_or_default(),
            script_hash(&event.script.exec)
        ),
    }
}

/// Short content hash of a script body, only used to deduplicate events.
fn script_hash(exec: &[String]) -> String {
    let hash = blake3::hash(exec.join("\n").as_bytes());
    hash.to_hex().as_str()[..16].to_string()
}

/// Union of two event lists, existing first.
pub fn merge_events(existing: &[EventEntry], incoming: &[EventEntry]) -> Vec<EventEntry> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());
    for event in existing.iter().chain(incoming) {
        if seen.insert(event_identity(event)) {
            merged.push(event.clone());
        }
    }
    merged
}

/// Union of two variable lists keyed by `key`; the existing value wins.
///
/// Variables without a key cannot be identified and are dropped.
pub fn merge_variables(existing: &[Variable], incoming: &[Variable]) -> Vec<Variable> {
    let mut seen: HashSet<&str> = HashSet::new();
    existing
        .iter()
        .chain(incoming)
        .filter(|variable| match variable.key.as_deref() {
            Some(key) => seen.insert(key),
            None => false,
        })
        .cloned()
        .collect()
}

/// Whether an auth value carries any configuration.
///
/// Lists must be non-empty, maps must have at least one key, `null` is empty.
/// Other scalars count as configured.
pub fn auth_is_configured(auth: &Value) -> bool {
    match auth {
        Value::Null => false,
        Value::Array(entries) => !entries.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        _ => true,
    }
}

/// Pick the auth to keep: configured existing, else configured incoming,
/// else whichever side is present.
pub fn merge_auth<'a>(incoming: Option<&'a Value>, existing: Option<&'a Value>) -> Option<Value> {
    fn configured(auth: Option<&Value>) -> Option<&Value> {
        auth.filter(|a| auth_is_configured(a))
    }

    configured(existing)
        .or_else(|| configured(incoming))
        .or(existing)
        .or(incoming)
        .filter(|auth| !auth.is_null())
        .cloned()
}

/// Merged group-level metadata (collection root or folder).
pub struct MergedGroup {
    pub event: Vec<EventEntry>,
    pub variable: Vec<Variable>,
    pub auth: Option<Value>,
}

impl MergedGroup {
    pub fn apply_to(self, target: &mut impl GroupMetadata) {
        target.set_metadata(self.event, self.variable, self.auth);
    }
}

/// Run all three policies over a pair of groups.
pub fn merge_group(existing: &impl GroupMetadata, incoming: &impl GroupMetadata) -> MergedGroup {
    MergedGroup {
        event: merge_events(existing.events(), incoming.events()),
        variable: merge_variables(existing.variables(), incoming.variables()),
        auth: merge_auth(incoming.auth(), existing.auth()),
    }
}

/// Merged request-level metadata: events and the request's own auth.
pub struct MergedRequest {
    pub event: Vec<EventEntry>,
    pub auth: Option<Value>,
}

impl MergedRequest {
    pub fn apply_to(self, target: &mut RequestItem) {
        target.event = self.event;
        target.request.auth = self.auth;
    }
}

pub fn merge_request(existing: &RequestItem, incoming: &RequestItem) -> MergedRequest {
    MergedRequest {
        event: merge_events(&existing.event, &incoming.event),
        auth: merge_auth(incoming.request.auth.as_ref(), existing.request.auth.as_ref()),
    }
}
