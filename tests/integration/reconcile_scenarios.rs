use crate::support::tree;
use collection_sync::collection::key::{folder_key, request_key};
use collection_sync::reconcile::{collect_keys, diff, merge_collections, preserve_metadata};
use collection_sync::sync::{reconcile, SyncMode};
use serde_json::json;

#[test]
fn renamed_controller_folder_keeps_request_scripts() {
    let existing = tree(json!({
        "info": {"name": "C"},
        "item": [{
            "name": "Orders",
            "item": [{
                "name": "getAllOrders",
                "event": [{"listen": "prerequest", "script": {"id": "x1", "exec": ["pm.test()"]}}],
                "request": {"method": "GET", "url": "{{baseUrl}}/orders"}
            }]
        }]
    }));
    let incoming = tree(json!({
        "info": {"name": "C"},
        "item": [{
            "name": "OrdersController",
            "item": [{
                "name": "getAllOrders",
                "request": {"method": "GET", "url": "{{baseUrl}}/orders"}
            }]
        }]
    }));

    let mut preserved = incoming.clone();
    let report = preserve_metadata(&existing, &mut preserved);
    assert_eq!(report.matched_folders, 1);
    assert_eq!(report.matched_requests, 1);

    let folder = preserved.item[0].as_folder().unwrap();
    assert_eq!(folder.name, "OrdersController");
    let request = folder.item[0].as_request().unwrap();
    assert_eq!(request.event.len(), 1);
    assert_eq!(request.event[0].script.id.as_deref(), Some("x1"));

    assert!(diff(&existing, &incoming).is_empty());
}

#[test]
fn dropped_request_follows_strategy() {
    let existing = tree(json!({
        "info": {"name": "C"},
        "item": [{
            "name": "Users",
            "item": [
                {"name": "getUser", "request": {"method": "GET", "url": "{{baseUrl}}/users/:id"}},
                {"name": "deleteUser", "request": {"method": "POST", "url": "{{baseUrl}}/users/delete"}}
            ]
        }]
    }));
    let incoming = tree(json!({
        "info": {"name": "C"},
        "item": [{
            "name": "Users",
            "item": [
                {"name": "getUser", "request": {"method": "GET", "url": "{{baseUrl}}/users/:id"}}
            ]
        }]
    }));

    let report = diff(&existing, &incoming);
    assert_eq!(report.removed_requests, vec!["POST::deleteuser"]);
    assert!(report.removed_folders.is_empty());

    let replaced = reconcile(existing.clone(), &incoming, SyncMode::Replace);
    assert!(!collect_keys(&replaced.payload.item)
        .requests
        .contains(&"POST::deleteuser".to_string()));

    let merged = reconcile(existing, &incoming, SyncMode::Merge);
    assert!(collect_keys(&merged.payload.item)
        .requests
        .contains(&"POST::deleteuser".to_string()));
}

#[test]
fn folder_key_aliases_collide() {
    assert_eq!(folder_key("Order Controller"), folder_key("ordercontroller"));
    assert_eq!(folder_key("ordercontroller"), folder_key("ORDER_CONTROLLER"));
}

#[test]
fn blank_request_name_falls_back_to_url() {
    let collection = tree(json!({
        "info": {"name": "C"},
        "item": [{
            "name": "  ",
            "request": {
                "method": "delete",
                "url": {"protocol": "https", "host": ["api", "example", "com"], "path": ["v1", "items"]}
            }
        }]
    }));
    assert_eq!(
        request_key(&collection.item[0]).unwrap(),
        "delete::https://api.example.com/v1/items"
    );
}

#[test]
fn merge_absorbs_incoming_metadata_without_touching_bodies() {
    let existing = tree(json!({
        "info": {"name": "C"},
        "item": [{
            "name": "getUser",
            "request": {
                "method": "GET",
                "url": "{{baseUrl}}/users/:id",
                "body": {"mode": "raw", "raw": "{}"}
            }
        }]
    }));
    let incoming = tree(json!({
        "info": {"name": "C"},
        "item": [{
            "name": "getUser",
            "event": [{"listen": "test", "script": {"exec": "pm.expect(1).to.eql(1)"}}],
            "request": {"method": "GET", "url": "{{baseUrl}}/v2/users/:id", "auth": {"type": "bearer"}}
        }]
    }));

    let (merged, report) = merge_collections(existing, &incoming);
    assert_eq!(report.merged_requests, 1);
    assert_eq!(report.added_requests, 0);

    let document = serde_json::to_value(&merged).unwrap();
    let request = &document["item"][0];
    assert_eq!(request["request"]["url"], "{{baseUrl}}/users/:id");
    assert_eq!(request["request"]["body"]["raw"], "{}");
    assert_eq!(request["request"]["auth"]["type"], "bearer");
    assert_eq!(request["event"][0]["script"]["exec"][0], "pm.expect(1).to.eql(1)");
}

#[test]
fn diff_is_repeatable() {
    let existing = crate::support::persisted_sales();
    let incoming = tree(json!({"info": {"name": "C"}, "item": []}));
    let first = diff(&existing, &incoming);
    let second = diff(&existing, &incoming);
    assert_eq!(first, second);
    assert_eq!(
        first.removed_folders,
        vec!["FOLDER::sales", "FOLDER::orders"]
    );
}
