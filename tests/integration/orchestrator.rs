use crate::support::{child_names, persisted_sales, sales_spec, write_source};
use collection_sync::config::SyncOptions;
use collection_sync::error::SyncError;
use collection_sync::source::OpenApiConverter;
use collection_sync::store::{MemoryDocumentStore, StoreWrite};
use collection_sync::sync::{SyncMode, SyncOrchestrator, WriteOutcome};
use serde_json::json;
use tempfile::TempDir;

fn options(prune: bool) -> SyncOptions {
    SyncOptions {
        prune,
        collection_name: "API_COLLECTION".to_string(),
        source_glob: "services/**/designtime/*_API.json".to_string(),
    }
}

fn sales_workspace() -> TempDir {
    let workspace = TempDir::new().unwrap();
    write_source(workspace.path(), "sales", "Sales_API.json", &sales_spec());
    workspace
}

#[tokio::test]
async fn replace_run_preserves_scripts_and_drops_stale_requests() {
    let workspace = sales_workspace();
    let store = MemoryDocumentStore::with_document("uid-1", persisted_sales());
    let converter = OpenApiConverter::new();
    let orchestrator = SyncOrchestrator::new(options(true), workspace.path(), &converter, &store);

    let report = orchestrator.run("uid-1", false).await.unwrap();
    assert_eq!(report.mode, SyncMode::Replace);
    assert_eq!(report.outcome, WriteOutcome::Replaced);
    assert_eq!(report.services, 1);
    assert_eq!(report.diff.removed_requests, vec!["POST::deleteuser"]);
    assert!(report.diff.removed_folders.is_empty());
    assert!(report.merged.is_none());
    assert_eq!(store.writes(), vec![StoreWrite::Replaced { id: "uid-1".into() }]);

    let stored = store.get("uid-1").unwrap();
    assert_eq!(child_names(&stored, &["sales"]), vec!["Orders"]);
    assert_eq!(
        child_names(&stored, &["sales", "Orders"]),
        vec!["getAllOrders", "createOrder", "getOrder"]
    );

    let document = serde_json::to_value(&stored).unwrap();
    let orders = &document["item"][0]["item"][0]["item"];
    assert_eq!(orders[0]["event"][0]["script"]["id"], "x1");
    assert_eq!(orders[1]["request"]["description"], "Place an order");
    assert_eq!(orders[2]["request"]["url"]["raw"], "{{baseUrl}}/orders/:id");
    assert_eq!(document["auth"]["type"], "apikey");
    assert_eq!(document["variable"][0]["value"], "https://prod.example.com");
}

#[tokio::test]
async fn merge_run_keeps_everything_persisted() {
    let workspace = sales_workspace();
    let store = MemoryDocumentStore::with_document("uid-1", persisted_sales());
    let converter = OpenApiConverter::new();
    let orchestrator = SyncOrchestrator::new(options(false), workspace.path(), &converter, &store);

    let report = orchestrator.run("uid-1", false).await.unwrap();
    assert_eq!(report.mode, SyncMode::Merge);
    let merged = report.merged.unwrap();
    assert_eq!(merged.added_requests, 2);
    assert_eq!(merged.added_folders, 0);
    assert_eq!(merged.merged_requests, 1);

    let stored = store.get("uid-1").unwrap();
    assert_eq!(
        child_names(&stored, &["sales"]),
        vec!["OrdersController", "deleteUser"]
    );
    assert_eq!(
        child_names(&stored, &["sales", "OrdersController"]),
        vec!["getAllOrders", "createOrder", "getOrder"]
    );

    let document = serde_json::to_value(&stored).unwrap();
    assert_eq!(document["info"]["_postman_id"], "abc-123");
    let get_all = &document["item"][0]["item"][0]["item"][0];
    assert_eq!(get_all["request"]["header"][0]["key"], "X-Trace");
    assert_eq!(get_all["event"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_collection_is_created() {
    let workspace = sales_workspace();
    let store = MemoryDocumentStore::new();
    let converter = OpenApiConverter::new();
    let orchestrator = SyncOrchestrator::new(options(true), workspace.path(), &converter, &store);

    let report = orchestrator.run("unknown-uid", false).await.unwrap();
    assert_eq!(report.outcome, WriteOutcome::Created);
    assert!(report.diff.is_empty());
    assert_eq!(store.writes(), vec![StoreWrite::Created { id: "memory-1".into() }]);

    let created = store.get("memory-1").unwrap();
    assert_eq!(created.info.name, "API_COLLECTION");
    assert_eq!(
        created.info.schema.as_deref(),
        Some("https://schema.getpostman.com/json/collection/v2.1.0/collection.json")
    );
}

#[tokio::test]
async fn dry_run_never_writes() {
    let workspace = sales_workspace();
    let store = MemoryDocumentStore::with_document("uid-1", persisted_sales());
    let converter = OpenApiConverter::new();
    let orchestrator = SyncOrchestrator::new(options(true), workspace.path(), &converter, &store);

    let report = orchestrator.run("uid-1", true).await.unwrap();
    assert_eq!(report.outcome, WriteOutcome::Skipped);
    assert!(store.writes().is_empty());
    assert_eq!(store.get("uid-1").unwrap(), persisted_sales());
    assert_eq!(child_names(&report.payload, &["sales"]), vec!["Orders"]);
}

#[tokio::test]
async fn conversion_failure_aborts_before_writing() {
    let workspace = sales_workspace();
    write_source(
        workspace.path(),
        "billing",
        "Billing_API.json",
        &json!({"openapi": "3.0.0", "info": {"title": "Billing", "version": "1.0.0"}}),
    );
    let store = MemoryDocumentStore::with_document("uid-1", persisted_sales());
    let converter = OpenApiConverter::new();
    let orchestrator = SyncOrchestrator::new(options(true), workspace.path(), &converter, &store);

    let result = orchestrator.run("uid-1", false).await;
    assert!(matches!(result, Err(SyncError::ConversionFailed { .. })));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn services_are_appended_in_path_order() {
    let workspace = sales_workspace();
    write_source(
        workspace.path(),
        "accounts",
        "Accounts_API.json",
        &json!({"openapi": "3.0.0", "paths": {"/accounts": {"get": {"summary": "listAccounts"}}}}),
    );
    write_source(
        workspace.path(),
        "accounts",
        "notes.json",
        &json!({"ignored": true}),
    );
    let store = MemoryDocumentStore::new();
    let converter = OpenApiConverter::new();
    let orchestrator = SyncOrchestrator::new(options(true), workspace.path(), &converter, &store);

    let report = orchestrator.run("new", true).await.unwrap();
    assert_eq!(report.services, 2);
    assert_eq!(child_names(&report.payload, &[]), vec!["accounts", "sales"]);
    assert_eq!(child_names(&report.payload, &["accounts"]), vec!["listAccounts"]);
}
