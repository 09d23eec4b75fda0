//! MCP file server entry point.
//!
//! # Usage
//!
//! ```bash
//! mcp-file-server ./workspace --extensions txt,md,json
//! ```
//!
//! Or configure in an MCP client:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "files": {
//!       "command": "mcp-file-server",
//!       "args": ["/home/me/notes", "--extensions", "txt,md"]
//!     }
//!   }
//! }
//! ```
//!
//! The `resources/`, `tools/` and `prompts/` directories are created under
//! the base directory on startup; it must lie inside an allowed directory.

use anyhow::{Context, Result};
use clap::Parser;
use mcp_file_server::args::ServerArgs;
use mcp_file_server::{Dispatcher, FileServerService};
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is for MCP protocol)
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mcp_file_server=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    let args = ServerArgs::parse();
    tracing::info!(
        directories = ?args.directories,
        extensions = ?args.display_extensions(),
        "Starting mcp-file-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = args.into_config().context("invalid sandbox configuration")?;
    let dispatcher = Arc::new(
        Dispatcher::with_config(config)
            .await
            .context("failed to initialize capability managers")?,
    );

    let service = FileServerService::new(Arc::clone(&dispatcher))
        .serve(stdio())
        .await?;

    tokio::select! {
        quit = service.waiting() => {
            quit?;
            tracing::info!("client disconnected");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for interrupt")?;
            tracing::info!("interrupt received, shutting down");
        }
    }

    dispatcher.close().await?;
    tracing::info!("Server shutdown complete");
    Ok(())
}
