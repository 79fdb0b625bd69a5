use crate::support::{persisted_sales, sales_spec, write_json, write_source};
use clap::Parser;
use collection_sync::config::SyncConfig;
use collection_sync::tooling::cli::{Cli, CliContext, Commands};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn context(workspace: &TempDir) -> CliContext {
    CliContext::with_config(workspace.path().to_path_buf(), SyncConfig::default())
}

fn write_fixtures(workspace: &TempDir) {
    write_json(
        &workspace.path().join("existing.json"),
        &json!({"collection": serde_json::to_value(persisted_sales()).unwrap()}),
    );
    write_json(
        &workspace.path().join("incoming.json"),
        &json!({
            "info": {"name": "API_COLLECTION"},
            "item": [{
                "name": "sales",
                "item": [{
                    "name": "Orders",
                    "item": [{"name": "getAllOrders", "request": {"method": "GET", "url": "{{baseUrl}}/orders"}}]
                }]
            }]
        }),
    );
}

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["collection-sync", "sync"],
        vec!["collection-sync", "sync", "--no-prune", "--dry-run", "--format", "json"],
        vec!["collection-sync", "sync", "--collection-uid", "abc", "--output", "out.json"],
        vec!["collection-sync", "build", "--pattern", "specs/*.json"],
        vec!["collection-sync", "diff", "--existing", "a.json", "--incoming", "b.json"],
        vec![
            "collection-sync",
            "--workspace",
            "/tmp",
            "merge",
            "--existing",
            "a.json",
            "--incoming",
            "b.json",
            "--strategy",
            "merge",
        ],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_inputs() {
    assert!(Cli::try_parse_from(["collection-sync", "diff", "--existing", "a.json"]).is_err());
    assert!(Cli::try_parse_from(["collection-sync", "merge"]).is_err());
}

#[tokio::test]
async fn diff_command_reports_removals_as_json() {
    let workspace = TempDir::new().unwrap();
    write_fixtures(&workspace);

    let output = context(&workspace)
        .execute(&Commands::Diff {
            existing: "existing.json".into(),
            incoming: "incoming.json".into(),
            format: "json".into(),
        })
        .await
        .unwrap();
    let report: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["removed_requests"], json!(["POST::deleteuser"]));
    assert_eq!(report["removed_folders"], json!([]));
}

#[tokio::test]
async fn merge_command_writes_payload() {
    let workspace = TempDir::new().unwrap();
    write_fixtures(&workspace);
    let output_path = workspace.path().join("out").join("payload.json");

    let message = context(&workspace)
        .execute(&Commands::Merge {
            existing: "existing.json".into(),
            incoming: "incoming.json".into(),
            strategy: "replace".into(),
            output: Some(output_path.clone()),
        })
        .await
        .unwrap();
    assert!(message.contains("1 request(s)"));

    let payload: Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let request = &payload["item"][0]["item"][0]["item"][0];
    assert_eq!(request["name"], "getAllOrders");
    assert_eq!(request["event"][0]["script"]["id"], "x1");
    assert_eq!(payload["item"][0]["item"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn merge_strategy_keeps_stale_requests() {
    let workspace = TempDir::new().unwrap();
    write_fixtures(&workspace);

    let output = context(&workspace)
        .execute(&Commands::Merge {
            existing: "existing.json".into(),
            incoming: "incoming.json".into(),
            strategy: "merge".into(),
            output: None,
        })
        .await
        .unwrap();
    assert!(output.contains("deleteUser"));
}

#[tokio::test]
async fn unknown_strategy_is_rejected() {
    let workspace = TempDir::new().unwrap();
    write_fixtures(&workspace);

    let result = context(&workspace)
        .execute(&Commands::Merge {
            existing: "existing.json".into(),
            incoming: "incoming.json".into(),
            strategy: "union".into(),
            output: None,
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn build_command_converts_workspace_sources() {
    let workspace = TempDir::new().unwrap();
    write_source(workspace.path(), "sales", "Sales_API.json", &sales_spec());

    let output = context(&workspace)
        .execute(&Commands::Build {
            output: None,
            pattern: None,
        })
        .await
        .unwrap();
    let tree: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(tree["info"]["name"], "API_COLLECTION");
    assert_eq!(tree["item"][0]["name"], "sales");
    assert_eq!(tree["item"][0]["item"][0]["name"], "Orders");
}

#[tokio::test]
async fn missing_collection_file_is_an_error() {
    let workspace = TempDir::new().unwrap();
    let result = context(&workspace)
        .execute(&Commands::Diff {
            existing: "absent.json".into(),
            incoming: "absent.json".into(),
            format: "text".into(),
        })
        .await;
    assert!(result.is_err());
}
