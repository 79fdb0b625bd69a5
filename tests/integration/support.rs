//! Shared fixtures: collection documents and on-disk workspaces.

use collection_sync::CollectionTree;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

pub fn tree(document: Value) -> CollectionTree {
    CollectionTree::from_document(document, "fixture").unwrap()
}

/// Persisted collection with a hand-written script on `getAllOrders` and a
/// request the generator no longer produces.
pub fn persisted_sales() -> CollectionTree {
    tree(json!({
        "info": {"name": "API_COLLECTION", "_postman_id": "abc-123"},
        "auth": {"type": "apikey", "apikey": [{"key": "value", "value": "{{token}}"}]},
        "variable": [{"key": "baseUrl", "value": "https://prod.example.com"}],
        "item": [{
            "name": "sales",
            "item": [
                {
                    "name": "OrdersController",
                    "item": [{
                        "name": "getAllOrders",
                        "event": [{
                            "listen": "prerequest",
                            "script": {"id": "x1", "type": "text/javascript", "exec": ["pm.test()"]}
                        }],
                        "request": {
                            "method": "GET",
                            "url": "{{baseUrl}}/orders",
                            "header": [{"key": "X-Trace", "value": "1"}]
                        }
                    }]
                },
                {
                    "name": "deleteUser",
                    "request": {"method": "POST", "url": "{{baseUrl}}/users/delete"}
                }
            ]
        }]
    }))
}

pub fn sales_spec() -> Value {
    json!({
        "swagger": "2.0",
        "info": {"title": "Sales", "version": "v2"},
        "paths": {
            "/orders": {
                "get": {"tags": ["Orders"], "summary": "getAllOrders"},
                "post": {"tags": ["Orders"], "summary": "createOrder", "description": "Place an order"}
            },
            "/orders/{id}": {
                "get": {"tags": ["Orders"], "operationId": "getOrder"}
            }
        }
    })
}

/// Write `document` as `services/<service>/designtime/<file>` under `root`.
pub fn write_source(root: &Path, service: &str, file: &str, document: &Value) {
    let dir = root.join("services").join(service).join("designtime");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), serde_json::to_string_pretty(document).unwrap()).unwrap();
}

pub fn write_json(path: &Path, document: &Value) {
    fs::write(path, serde_json::to_string_pretty(document).unwrap()).unwrap();
}

/// Names of the direct children of the folder reached by `path`.
pub fn child_names(tree: &CollectionTree, path: &[&str]) -> Vec<String> {
    let mut items = &tree.item;
    for name in path {
        let folder = items
            .iter()
            .filter_map(|node| node.as_folder())
            .find(|folder| folder.name == *name)
            .unwrap_or_else(|| panic!("missing folder {}", name));
        items = &folder.item;
    }
    items.iter().map(|node| node.name().to_string()).collect()
}
