//! Sandbox behaviour of the file gateway across all operations.

use mcp_file_core::{Containment, FileConfig, FileOperation, OperationKind};
use mcp_file_gateway::FileGateway;
use tempfile::TempDir;

const ALL_KINDS: [OperationKind; 5] = [
    OperationKind::Read,
    OperationKind::Write,
    OperationKind::List,
    OperationKind::Delete,
    OperationKind::CreateDirectory,
];

struct Sandbox {
    root: TempDir,
    outside: TempDir,
    gateway: FileGateway,
}

fn sandbox() -> Sandbox {
    let root = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let config = FileConfig::builder()
        .allow_directory(root.path().join("allowed"))
        .allow_extensions(["txt", "md"])
        .base_dir(root.path())
        .build();
    std::fs::create_dir(root.path().join("allowed")).unwrap();

    Sandbox {
        gateway: FileGateway::new(&config).unwrap(),
        root,
        outside,
    }
}

fn operation(kind: OperationKind, path: &str) -> FileOperation {
    FileOperation::new(kind, path, Some("payload".to_string()))
}

/// Every operation outside the allowed directories is denied, whatever the extension.
#[tokio::test]
async fn test_paths_outside_allow_list_are_access_denied() {
    let sb = sandbox();
    let outside = sb.outside.path().display().to_string();
    let candidates = [
        format!("{outside}/file.txt"),
        format!("{outside}/file.exe"),
        format!("{outside}/dir"),
        "notallowed/file.txt".to_string(),
        "allowed/../escape.txt".to_string(),
        "allowed-sibling/file.txt".to_string(),
    ];

    for path in &candidates {
        for kind in ALL_KINDS {
            let response = sb.gateway.handle_operation(operation(kind, path)).await;
            let error = response
                .error()
                .unwrap_or_else(|| panic!("{kind} on {path} should be denied"));
            assert!(
                error.is_access_denied(),
                "{kind} on {path} should be AccessDenied, got {error}"
            );
            assert_eq!(error.to_string(), "Access to this directory is not allowed");
        }
    }

    assert!(!sb.root.path().join("escape.txt").exists());
}

/// File operations on a disallowed extension fail; directory operations do not.
#[tokio::test]
async fn test_extension_check_skips_directory_operations() {
    let sb = sandbox();
    let path = "allowed/data.bin";

    for kind in [OperationKind::Read, OperationKind::Write, OperationKind::Delete] {
        let response = sb.gateway.handle_operation(operation(kind, path)).await;
        let error = response.error().unwrap();
        assert!(error.is_extension_denied(), "{kind} should be ExtensionDenied");
        assert_eq!(error.to_string(), "File type not allowed");
    }

    let created = sb
        .gateway
        .handle_operation(FileOperation::create_directory(path))
        .await;
    assert!(created.is_success());

    let listed = sb.gateway.handle_operation(FileOperation::list(path)).await;
    assert!(listed.is_success());
    assert!(listed.entries().unwrap().is_empty());
}

#[tokio::test]
async fn test_write_then_read_returns_same_content() {
    let sb = sandbox();
    let content = "line one\nline two — with unicode ✓\n";

    let written = sb
        .gateway
        .handle_operation(FileOperation::write("allowed/notes.md", content))
        .await;
    assert!(written.is_success());

    let read = sb
        .gateway
        .handle_operation(FileOperation::read("allowed/notes.md"))
        .await;
    assert_eq!(read.text(), Some(content));
}

#[tokio::test]
async fn test_create_directory_is_idempotent() {
    let sb = sandbox();

    for _ in 0..2 {
        let response = sb
            .gateway
            .handle_operation(FileOperation::create_directory("allowed/nested/dir"))
            .await;
        assert!(response.is_success());
    }
    assert!(sb.root.path().join("allowed/nested/dir").is_dir());
}

#[tokio::test]
async fn test_prefix_containment_admits_shared_prefix_sibling() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir(root.path().join("data")).unwrap();
    std::fs::create_dir(root.path().join("database")).unwrap();
    std::fs::write(root.path().join("database/leak.txt"), "leaked").unwrap();

    let config = |containment| {
        FileConfig::builder()
            .allow_directory("data")
            .allow_extension("txt")
            .containment(containment)
            .base_dir(root.path())
            .build()
    };

    let hardened = FileGateway::new(&config(Containment::Ancestor)).unwrap();
    let response = hardened
        .handle_operation(FileOperation::read("database/leak.txt"))
        .await;
    assert!(response.error().unwrap().is_access_denied());

    let legacy = FileGateway::new(&config(Containment::Prefix)).unwrap();
    let response = legacy
        .handle_operation(FileOperation::read("database/leak.txt"))
        .await;
    assert_eq!(response.text(), Some("leaked"));
}

#[tokio::test]
async fn test_deny_all_config() {
    let root = TempDir::new().unwrap();
    let config = FileConfig::builder().base_dir(root.path()).build();
    let gateway = FileGateway::new(&config).unwrap();

    for kind in ALL_KINDS {
        let response = gateway.handle_operation(operation(kind, "anything.txt")).await;
        assert!(response.error().unwrap().is_access_denied());
    }
}
