//! End-to-end tests of parsed command lines against a temporary sandbox.

use clap::Parser;
use mcp_file_cli::Cli;
use mcp_file_cli::formatters::format_response;
use mcp_file_cli::runner::{exit_code_for, run_operation};
use mcp_file_core::cli::{ExitCode, OutputFormat};
use tempfile::TempDir;

async fn run(root: &TempDir, args: &[&str]) -> (String, ExitCode) {
    let dir = root.path().display().to_string();
    let mut argv = vec!["mcp-file-cli", "--dir", &dir, "--extensions", "txt,md"];
    argv.extend_from_slice(args);

    let cli = Cli::parse_from(argv);
    let format: OutputFormat = cli.format.parse().unwrap();
    let config = cli.sandbox.to_config(root.path()).unwrap();
    let operation = cli.command.into_operation();

    let response = run_operation(&config, operation.clone()).await.unwrap();
    let output = format_response(&operation, &response, format).unwrap();
    (output, exit_code_for(&response))
}

#[tokio::test]
async fn test_write_read_list_delete() {
    let root = TempDir::new().unwrap();

    let (output, code) = run(&root, &["--format", "text", "mkdir", "notes"]).await;
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(output, "ok: createDirectory notes");

    let (_, code) = run(&root, &["write", "notes/todo.md", "- milk"]).await;
    assert_eq!(code, ExitCode::SUCCESS);

    let (output, _) = run(&root, &["--format", "text", "read", "notes/todo.md"]).await;
    assert_eq!(output, "- milk");

    let (output, _) = run(&root, &["--format", "json", "list", "notes"]).await;
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value, serde_json::json!({"success": true, "data": ["todo.md"]}));

    let (_, code) = run(&root, &["delete", "notes/todo.md"]).await;
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(!root.path().join("notes/todo.md").exists());
}

#[tokio::test]
async fn test_sandbox_rejections() {
    let root = TempDir::new().unwrap();

    let (output, code) = run(&root, &["--format", "text", "read", "../outside.txt"]).await;
    assert_eq!(code, ExitCode::ACCESS_DENIED);
    assert_eq!(output, "error: Access to this directory is not allowed");

    let (output, code) = run(&root, &["--format", "text", "write", "run.sh", "echo"]).await;
    assert_eq!(code, ExitCode::ACCESS_DENIED);
    assert_eq!(output, "error: File type not allowed");
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    let root = TempDir::new().unwrap();

    let (_, code) = run(&root, &["read", "absent.txt"]).await;
    assert_eq!(code, ExitCode::NOT_FOUND);
}
