//! Collection document types.
//!
//! Mirrors the v2.1 collection JSON shape closely enough to reconcile it. Every
//! struct keeps the fields it does not interpret in a flattened `extra` map so a
//! tree fetched from the document store round-trips without losing bodies,
//! headers, descriptions or store-assigned ids.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema URL written into freshly created collections.
pub const COLLECTION_SCHEMA: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Collection header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Root collection document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionTree {
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: CollectionInfo,

    #[serde(default, deserialize_with = "null_as_default")]
    pub item: Vec<CollectionNode>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub event: Vec<EventEntry>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub variable: Vec<Variable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectionTree {
    /// Empty tree used when nothing has been persisted yet.
    pub fn empty(name: &str) -> Self {
        CollectionTree {
            info: CollectionInfo {
                name: name.to_string(),
                schema: Some(COLLECTION_SCHEMA.to_string()),
                extra: Map::new(),
            },
            item: Vec::new(),
            event: Vec::new(),
            variable: Vec::new(),
            auth: None,
            extra: Map::new(),
        }
    }

    /// Read a collection from either a bare tree or a `{"collection": tree}` envelope.
    ///
    /// Documents without an `item` array are not collections; they resolve to
    /// `CollectionTree::empty(default_name)`.
    pub fn from_document(document: Value, default_name: &str) -> Result<Self, serde_json::Error> {
        let mut document = document;
        if let Some(inner) = document.get_mut("collection") {
            document = inner.take();
        }
        if !document.get("item").map_or(false, Value::is_array) {
            return Ok(CollectionTree::empty(default_name));
        }
        serde_json::from_value(document)
    }
}

/// Either a folder or a request. A node is a request iff it carries `request`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CollectionNode {
    Folder(FolderNode),
    Request(RequestItem),
}

impl<'de> Deserialize<'de> for CollectionNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let is_request = value.get("request").map_or(false, |r| !r.is_null());
        if is_request {
            RequestItem::deserialize(value)
                .map(CollectionNode::Request)
                .map_err(de::Error::custom)
        } else {
            FolderNode::deserialize(value)
                .map(CollectionNode::Folder)
                .map_err(de::Error::custom)
        }
    }
}

impl CollectionNode {
    pub fn name(&self) -> &str {
        match self {
            CollectionNode::Folder(folder) => &folder.name,
            CollectionNode::Request(request) => &request.name,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            CollectionNode::Folder(folder) => Some(folder),
            CollectionNode::Request(_) => None,
        }
    }

    pub fn as_request(&self) -> Option<&RequestItem> {
        match self {
            CollectionNode::Request(request) => Some(request),
            CollectionNode::Folder(_) => None,
        }
    }
}

/// Named grouping of child nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub item: Vec<CollectionNode>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub event: Vec<EventEntry>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub variable: Vec<Variable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FolderNode {
    pub fn new(name: impl Into<String>, item: Vec<CollectionNode>) -> Self {
        FolderNode {
            name: name.into(),
            item,
            ..FolderNode::default()
        }
    }
}

/// Leaf node describing one HTTP operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    pub request: RequestSpec,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub event: Vec<EventEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestItem {
    pub fn new(name: impl Into<String>, method: &str, url: RequestUrl) -> Self {
        RequestItem {
            name: name.into(),
            request: RequestSpec {
                method: Some(method.to_string()),
                url: Some(url),
                auth: None,
                extra: Map::new(),
            },
            event: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// The `request` object of a request node.
///
/// The shorthand form, a bare URL string, is accepted and read as a GET.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RequestRepr")]
pub struct RequestSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<RequestUrl>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestSpec {
    /// HTTP verb, `GET` when absent.
    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or("GET")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequestRepr {
    Url(String),
    Full {
        #[serde(default)]
        method: Option<String>,
        #[serde(default)]
        url: Option<RequestUrl>,
        #[serde(default)]
        auth: Option<Value>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl From<RequestRepr> for RequestSpec {
    fn from(repr: RequestRepr) -> Self {
        match repr {
            RequestRepr::Url(url) => RequestSpec {
                method: None,
                url: Some(RequestUrl::Raw(url)),
                auth: None,
                extra: Map::new(),
            },
            RequestRepr::Full {
                method,
                url,
                auth,
                extra,
            } => RequestSpec {
                method,
                url,
                auth,
                extra,
            },
        }
    }
}

/// Request URL in string or structured form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestUrl {
    Raw(String),
    Structured(StructuredUrl),
}

/// Structured URL. `host` and `path` are kept as raw JSON because collections
/// in the wild carry them as strings, string arrays, or arrays of segment objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredUrl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Lifecycle script attached to a collection, folder or request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub listen: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub script: EventScript,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub script_type: Option<String>,

    #[serde(default, deserialize_with = "deserialize_exec")]
    pub exec: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn deserialize_exec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Exec {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Exec>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Exec::One(line)) => vec![line],
        Some(Exec::Many(lines)) => lines,
    })
}

/// Named value scoped to a collection or folder. Identity is `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Variable {
    pub fn new(key: &str, value: Value) -> Self {
        Variable {
            key: Some(key.to_string()),
            value: Some(value),
            extra: Map::new(),
        }
    }
}

/// Metadata carried by grouping levels (collection root and folders).
pub trait GroupMetadata {
    fn events(&self) -> &[EventEntry];
    fn variables(&self) -> &[Variable];
    fn auth(&self) -> Option<&Value>;
    fn set_metadata(&mut self, event: Vec<EventEntry>, variable: Vec<Variable>, auth: Option<Value>);
}

impl GroupMetadata for CollectionTree {
    fn events(&self) -> &[EventEntry] {
        &self.event
    }

    fn variables(&self) -> &[Variable] {
        &self.variable
    }

    fn auth(&self) -> Option<&Value> {
        self.auth.as_ref()
    }

    fn set_metadata(&mut self, event: Vec<EventEntry>, variable: Vec<Variable>, auth: Option<Value>) {
        self.event = event;
        self.variable = variable;
        self.auth = auth;
    }
}

impl GroupMetadata for FolderNode {
    fn events(&self) -> &[EventEntry] {
        &self.event
    }

    fn variables(&self) -> &[Variable] {
        &self.variable
    }

    fn auth(&self) -> Option<&Value> {
        self.auth.as_ref()
    }

    fn set_metadata(&mut self, event: Vec<EventEntry>, variable: Vec<Variable>, auth: Option<Value>) {
        self.event = event;
        self.variable = variable;
        self.auth = auth;
    }
}
