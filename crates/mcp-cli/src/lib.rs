//! Operator CLI for the MCP file server's sandboxed gateway.
//!
//! Runs a single file operation under the same directory and extension
//! allow-lists the server enforces, and prints the gateway response.
//!
//! # Examples
//!
//! ```bash
//! mcp-file-cli --dir ./notes --extensions md,txt list ./notes
//! mcp-file-cli --dir ./notes --extensions md --format json read ./notes/todo.md
//! ```

pub mod cli;
pub mod formatters;
pub mod runner;

pub use cli::{Cli, Commands, SandboxArgs};
