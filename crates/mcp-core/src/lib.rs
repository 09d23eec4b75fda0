//! Core types, configuration, and errors for the MCP file server.
//!
//! This crate provides the foundational types shared by the sandboxed file
//! gateway, the capability managers, and the operator CLI.
//!
//! # Architecture
//!
//! The core consists of:
//! - The error hierarchy used by every layer (`Error`, `Result`)
//! - Sandbox configuration (`FileConfig`, `Containment`)
//! - The gateway's request/response vocabulary (`FileOperation`, `FileResponse`)
//! - CLI helper types (`cli::OutputFormat`, `cli::ExitCode`)
//!
//! # Examples
//!
//! ```
//! use mcp_file_core::{FileConfig, FileOperation};
//!
//! let config = FileConfig::builder()
//!     .allow_directory("/srv/data")
//!     .allow_extension("txt")
//!     .build();
//! assert_eq!(config.allowed_extensions, vec!["txt".to_string()]);
//!
//! let op = FileOperation::read("/srv/data/notes.txt");
//! assert_eq!(op.kind().as_str(), "read");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod cli;
mod config;
mod error;
mod types;

pub use config::{Containment, FileConfig, FileConfigBuilder, normalize_extension};
pub use error::{Error, Result};
pub use types::{FileData, FileOperation, FileResponse, OperationKind};
