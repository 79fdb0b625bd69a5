//! Comparison keys for collection nodes.
//!
//! Nodes carry no stable ids across regenerations, so identity is derived from
//! normalized names. Normalization is deliberately lossy: `Order Controller`,
//! `order-controller` and `ordercontroller` all collide, which lets generated
//! folder names line up with hand-edited ones.

use crate::collection::model::{CollectionNode, RequestItem, RequestUrl};
use serde_json::Value;

const CONTROLLER_SUFFIX: &str = "controller";

/// Canonicalize a display name or URL into a comparison key.
pub fn normalize(s: &str) -> String {
    let mut key: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();
    // Repeated so that normalizing an already-normalized key is a no-op.
    while key.ends_with(CONTROLLER_SUFFIX) {
        key.truncate(key.len() - CONTROLLER_SUFFIX.len());
    }
    key
}

/// String form of a request URL, used when a request has no usable name.
pub fn canonical_url(url: Option<&RequestUrl>) -> String {
    let structured = match url {
        None => return String::new(),
        Some(RequestUrl::Raw(raw)) => return raw.clone(),
        Some(RequestUrl::Structured(structured)) => structured,
    };
    if let Some(raw) = &structured.raw {
        return raw.clone();
    }

    let protocol = structured
        .protocol
        .as_deref()
        .map(|p| format!("{}://", p))
        .unwrap_or_default();
    let host = structured
        .host
        .as_ref()
        .map(|h| join_segments(h, "."))
        .unwrap_or_default();
    let path = structured
        .path
        .as_ref()
        .map(|p| format!("/{}", join_segments(p, "/")))
        .unwrap_or_default();
    format!("{}{}{}", protocol, host, path)
}

fn join_segments(value: &Value, separator: &str) -> String {
    match value {
        Value::Array(segments) => segments
            .iter()
            .map(segment_text)
            .collect::<Vec<_>>()
            .join(separator),
        other => segment_text(other),
    }
}

fn segment_text(segment: &Value) -> String {
    match segment {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Object(map) => map.get("value").map(segment_text).unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Key of a request item: `METHOD::normalized-name-or-url`.
pub fn request_item_key(request: &RequestItem) -> String {
    let name_or_url = if request.name.trim().is_empty() {
        canonical_url(request.request.url.as_ref())
    } else {
        request.name.clone()
    };
    format!("{}::{}", request.request.method(), normalize(&name_or_url))
}

/// Key of a node, `None` for folders.
pub fn request_key(node: &CollectionNode) -> Option<String> {
    node.as_request().map(request_item_key)
}

/// Key of a folder: `FOLDER::normalized-name`.
pub fn folder_key(name: &str) -> String {
    format!("FOLDER::{}", normalize(name))
}
