//! Converter boundary: specification document in, collection fragment out.

use crate::collection::model::{CollectionNode, FolderNode, RequestItem, RequestUrl, StructuredUrl};
use crate::error::SyncError;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Turns one normalized specification document into a service folder.
///
/// Any error aborts the whole run; converters are never retried.
#[async_trait]
pub trait SpecConverter: Send + Sync {
    async fn convert(&self, document: &Value, service: &str) -> Result<FolderNode, SyncError>;
}

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

const BASE_URL_VARIABLE: &str = "{{baseUrl}}";

/// Built-in OpenAPI 3 converter.
///
/// Operations become requests grouped into one folder per first tag; untagged
/// operations sit directly in the service folder. Document order is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiConverter;

impl OpenApiConverter {
    pub fn new() -> Self {
        OpenApiConverter
    }

    fn convert_document(&self, document: &Value, service: &str) -> Result<FolderNode, SyncError> {
        let paths = document
            .get("paths")
            .and_then(Value::as_object)
            .ok_or_else(|| SyncError::ConversionFailed {
                service: service.to_string(),
                reason: "document has no paths object".to_string(),
            })?;

        let mut service_folder = FolderNode::new(service, Vec::new());
        let mut tag_folders: HashMap<String, usize> = HashMap::new();

        for (path, path_item) in paths {
            let Some(operations) = path_item.as_object() else {
                continue;
            };
            for (method, operation) in operations {
                let method = method.to_ascii_lowercase();
                if !HTTP_METHODS.contains(&method.as_str()) {
                    continue;
                }
                let request = build_request(path, &method, operation);

                match first_tag(operation) {
                    Some(tag) => {
                        let position = *tag_folders.entry(tag.to_string()).or_insert_with(|| {
                            service_folder
                                .item
                                .push(CollectionNode::Folder(FolderNode::new(tag, Vec::new())));
                            service_folder.item.len() - 1
                        });
                        if let CollectionNode::Folder(folder) = &mut service_folder.item[position] {
                            folder.item.push(CollectionNode::Request(request));
                        }
                    }
                    None => service_folder.item.push(CollectionNode::Request(request)),
                }
            }
        }

        debug!(
            service,
            nodes = service_folder.item.len(),
            "Converted specification document"
        );
        Ok(service_folder)
    }
}

#[async_trait]
impl SpecConverter for OpenApiConverter {
    async fn convert(&self, document: &Value, service: &str) -> Result<FolderNode, SyncError> {
        self.convert_document(document, service)
    }
}

fn first_tag(operation: &Value) -> Option<&str> {
    operation
        .get("tags")
        .and_then(Value::as_array)
        .and_then(|tags| tags.first())
        .and_then(Value::as_str)
        .filter(|tag| !tag.trim().is_empty())
}

fn build_request(path: &str, method: &str, operation: &Value) -> RequestItem {
    let non_empty = |field: &str| {
        operation
            .get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
    };
    let name = non_empty("summary")
        .or_else(|| non_empty("operationId"))
        .unwrap_or_else(|| format!("{} {}", method.to_ascii_uppercase(), path));

    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(path_segment)
        .collect();
    let url = RequestUrl::Structured(StructuredUrl {
        raw: Some(format!("{}/{}", BASE_URL_VARIABLE, segments.join("/"))),
        protocol: None,
        host: Some(json!([BASE_URL_VARIABLE])),
        path: Some(json!(segments)),
        extra: Map::new(),
    });

    let mut request = RequestItem::new(name, &method.to_ascii_uppercase(), url);
    if let Some(description) = non_empty("description") {
        request
            .request
            .extra
            .insert("description".to_string(), Value::String(description));
    }
    request
}

/// `{id}` path templates become `:id` path variables.
fn path_segment(segment: &str) -> String {
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(name) => format!(":{}", name),
        None => segment.to_string(),
    }
}
