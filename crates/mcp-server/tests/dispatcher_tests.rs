//! End-to-end tests of the dispatcher over a temporary sandbox.

use mcp_file_core::FileConfig;
use mcp_file_server::{Dispatcher, Request};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

fn config_for(root: &TempDir) -> FileConfig {
    FileConfig::builder()
        .allow_directory(root.path())
        .allow_extensions(["txt", "json", "md"])
        .base_dir(root.path())
        .build()
}

async fn configured(root: &TempDir) -> Dispatcher {
    Dispatcher::with_config(config_for(root)).await.unwrap()
}

fn texts(result: &Value) -> Vec<String> {
    result["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["text"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_configuration_creates_capability_directories() {
    let root = TempDir::new().unwrap();
    let dispatcher = Dispatcher::new();

    let result = dispatcher
        .dispatch_raw(
            "config/set",
            Some(json!({ "config": serde_json::to_value(config_for(&root)).unwrap() })),
        )
        .await
        .unwrap();
    assert_eq!(result, json!({"success": true}));
    assert!(dispatcher.is_configured().await);

    for dir in ["resources", "tools", "prompts"] {
        assert!(root.path().join(dir).is_dir(), "{dir} should exist");
    }
}

#[tokio::test]
async fn test_requests_before_configuration_are_rejected() {
    let dispatcher = Dispatcher::new();

    for method in [
        "tools/list",
        "resources/list",
        "resources/templates/list",
        "prompts/list",
    ] {
        let err = dispatcher.dispatch_raw(method, None).await.unwrap_err();
        assert!(err.is_not_configured(), "{method} should need configuration");
    }

    let info = dispatcher.dispatch_raw("server/info", None).await.unwrap();
    assert_eq!(info["name"], json!("mcp-file-server"));
    assert!(info["version"].is_string());
}

#[tokio::test]
async fn test_second_configuration_is_rejected() {
    let root = TempDir::new().unwrap();
    let dispatcher = configured(&root).await;

    let err = dispatcher.configure(config_for(&root)).await.unwrap_err();
    assert!(err.is_invalid_input());
    assert!(dispatcher.is_configured().await);
}

#[tokio::test]
async fn test_failed_initialization_leaves_dispatcher_unconfigured() {
    let root = TempDir::new().unwrap();
    let dispatcher = Dispatcher::new();

    // The base directory lies outside the only allowed directory, so no
    // manager can create its directory.
    let config = FileConfig::builder()
        .allow_directory(root.path().join("elsewhere"))
        .allow_extension("txt")
        .base_dir(root.path())
        .build();

    let err = dispatcher.configure(config).await.unwrap_err();
    assert!(err.is_internal());
    assert!(err.to_string().starts_with("Failed to initialize "));
    assert!(!dispatcher.is_configured().await);

    // A corrected configuration can still be applied.
    dispatcher.configure(config_for(&root)).await.unwrap();
    assert!(dispatcher.is_configured().await);
}

#[tokio::test]
async fn test_tool_round_trip_through_dispatcher() {
    let root = TempDir::new().unwrap();
    let dispatcher = configured(&root).await;

    let tools = dispatcher.dispatch_raw("tools/list", None).await.unwrap();
    assert_eq!(tools["tools"].as_array().unwrap().len(), 4);
    assert!(tools.get("nextCursor").is_none());

    let written = dispatcher
        .dispatch_raw(
            "tools/call",
            Some(json!({"name": "writeFile", "arguments": {"path": "notes.md", "content": "# Notes"}})),
        )
        .await
        .unwrap();
    assert_eq!(texts(&written), ["Successfully wrote to file: notes.md"]);
    assert!(written.get("isError").is_none());

    let read = dispatcher
        .dispatch(Request::parse(
            "tools/call",
            Some(json!({"name": "readFile", "arguments": {"path": "notes.md"}})),
        )
        .unwrap())
        .await
        .unwrap();
    assert_eq!(texts(&read), ["# Notes"]);
}

#[tokio::test]
async fn test_tool_failures_are_results_not_errors() {
    let root = TempDir::new().unwrap();
    let dispatcher = configured(&root).await;

    let unknown = dispatcher
        .dispatch_raw("tools/call", Some(json!({"name": "renameFile"})))
        .await
        .unwrap();
    assert_eq!(unknown["isError"], json!(true));
    assert_eq!(texts(&unknown), ["Unknown tool: renameFile"]);

    let outside = dispatcher
        .dispatch_raw(
            "tools/call",
            Some(json!({"name": "readFile", "arguments": {"path": "/etc/passwd"}})),
        )
        .await
        .unwrap();
    assert_eq!(outside["isError"], json!(true));
    assert!(texts(&outside)[0].contains("Access to this directory is not allowed"));
}

#[tokio::test]
async fn test_resource_listing_skips_bad_entries() {
    let root = TempDir::new().unwrap();
    let dispatcher = configured(&root).await;
    let resources = root.path().join("resources");
    fs::write(resources.join("good.txt"), "hello").unwrap();
    fs::write(resources.join("empty.txt"), "").unwrap();
    fs::write(resources.join("binary.exe"), "MZ").unwrap();
    fs::write(resources.join(".gitkeep"), "").unwrap();
    fs::create_dir(resources.join("nested.txt")).unwrap();

    let listed = dispatcher.dispatch_raw("resources/list", None).await.unwrap();
    assert_eq!(
        listed,
        json!({"resources": [{"name": "good.txt", "uri": "file://resources/good.txt"}]})
    );

    let read = dispatcher
        .dispatch_raw(
            "resources/read",
            Some(json!({"uri": "file://resources/good.txt"})),
        )
        .await
        .unwrap();
    assert_eq!(
        read,
        json!({"contents": [{
            "uri": "file://resources/good.txt",
            "mimeType": "text/plain",
            "text": "hello"
        }]})
    );

    let err = dispatcher
        .dispatch_raw(
            "resources/read",
            Some(json!({"uri": "file://resources/empty.txt"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to read resource file://resources/empty.txt");
}

#[tokio::test]
async fn test_resource_templates() {
    let root = TempDir::new().unwrap();
    let dispatcher = configured(&root).await;

    let templates = dispatcher
        .dispatch_raw("resources/templates/list", None)
        .await
        .unwrap();
    let uris: Vec<_> = templates["resourceTemplates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["uriTemplate"].as_str().unwrap())
        .collect();
    assert_eq!(uris, ["resources/{name}.txt", "resources/{name}.json"]);
}

#[tokio::test]
async fn test_unknown_request_kind() {
    let root = TempDir::new().unwrap();
    let dispatcher = configured(&root).await;

    let err = dispatcher.dispatch_raw("files/rename", None).await.unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(err.to_string(), "Unknown request kind: files/rename");
}

#[tokio::test]
async fn test_close_stops_serving() {
    let root = TempDir::new().unwrap();
    let dispatcher = configured(&root).await;

    dispatcher.close().await.unwrap();
    dispatcher.close().await.unwrap();

    let err = dispatcher.dispatch_raw("tools/list", None).await.unwrap_err();
    assert!(err.is_closed());
    assert!(!dispatcher.is_configured().await);
}
