//! Sandboxed file gateway for the MCP file server.
//!
//! Every filesystem access made on behalf of a caller goes through a
//! [`FileGateway`], which consults a [`SandboxPolicy`] before touching the
//! disk. The gateway is stateless apart from its policy and never fails:
//! policy rejections, missing fields, and I/O errors all come back as a
//! failed [`FileResponse`](mcp_file_core::FileResponse).
//!
//! # Examples
//!
//! ```
//! use mcp_file_core::{FileConfig, FileOperation};
//! use mcp_file_gateway::FileGateway;
//! # use tempfile::TempDir;
//!
//! # async fn example() -> mcp_file_core::Result<()> {
//! # let temp = TempDir::new().unwrap();
//! let config = FileConfig::builder()
//!     .allow_directory(temp.path())
//!     .allow_extension("txt")
//!     .build();
//! let gateway = FileGateway::new(&config)?;
//!
//! let path = temp.path().join("hello.txt").display().to_string();
//! assert!(gateway.handle_operation(FileOperation::write(&path, "hi")).await.is_success());
//!
//! let response = gateway.handle_operation(FileOperation::read(&path)).await;
//! assert_eq!(response.text(), Some("hi"));
//!
//! let denied = gateway.handle_operation(FileOperation::read("/etc/passwd")).await;
//! assert!(denied.error().unwrap().is_access_denied());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod gateway;
mod policy;

pub use gateway::FileGateway;
pub use policy::{SandboxPolicy, resolve_lexically};
