//! MCP server exposing a sandboxed filesystem.
//!
//! Files are served through three capability families:
//!
//! 1. **Resources** - non-empty files under `resources/`, readable by URI
//! 2. **Tools** - `readFile`, `writeFile`, `listDirectory`, `deleteFile`
//! 3. **Prompts** - JSON definitions under `prompts/`, rendered with
//!    `{{argument}}` substitution
//!
//! Every file access goes through a [`FileGateway`](mcp_file_gateway::FileGateway),
//! so the same directory and extension allow-lists apply to callers and to
//! the managers themselves.
//!
//! # Architecture
//!
//! - [`manager`] - the [`CapabilityManager`] contract and its three implementations
//! - [`template`] - placeholder expansion for prompt messages
//! - [`Dispatcher`] - request routing and the configuration lifecycle
//! - [`FileServerService`] - rmcp `ServerHandler` adapter
//!
//! # Examples
//!
//! ```no_run
//! use mcp_file_core::FileConfig;
//! use mcp_file_server::Dispatcher;
//! use serde_json::json;
//!
//! # async fn example() -> mcp_file_core::Result<()> {
//! let config = FileConfig::builder()
//!     .allow_directory("/srv/files")
//!     .allow_extensions(["txt", "json"])
//!     .base_dir("/srv/files")
//!     .build();
//! let dispatcher = Dispatcher::with_config(config).await?;
//!
//! let result = dispatcher
//!     .dispatch_raw(
//!         "tools/call",
//!         Some(json!({"name": "readFile", "arguments": {"path": "resources/notes.txt"}})),
//!     )
//!     .await?;
//! println!("{}", result["content"][0]["text"]);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod args;
pub mod dispatcher;
pub mod manager;
pub mod service;
pub mod subscription;
pub mod template;
pub mod types;

pub use dispatcher::{Capabilities, Dispatcher, Request, SERVER_NAME, SERVER_VERSION};
pub use manager::{
    CapabilityFamily, CapabilityManager, PromptManager, ResourceManager, ToolManager,
};
pub use service::FileServerService;
pub use subscription::{Subscribers, Subscription};
