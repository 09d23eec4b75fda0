//! Capability managers.
//!
//! Each capability family (resources, tools, prompts) owns a directory
//! relative to the gateway's base directory and implements
//! [`CapabilityManager`]. All file access goes through the shared
//! [`FileGateway`], so managers are subject to the same sandbox as callers.

mod prompt;
mod resource;
mod tool;

pub use prompt::{PromptManager, PromptRequest};
pub use resource::{ResourceManager, mime_type_for};
pub use tool::{FileTool, ToolCall, ToolManager};

use async_trait::async_trait;
use mcp_file_core::{Error, FileOperation, Result};
use mcp_file_gateway::FileGateway;
use std::fmt;
use tracing::{error, info};

/// The three capability families served over MCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityFamily {
    /// Readable artifacts under `resources/`
    Resources,
    /// Invokable file operations, directory `tools/`
    Tools,
    /// Templated message generators under `prompts/`
    Prompts,
}

impl CapabilityFamily {
    /// All families, in initialization order.
    pub const ALL: [Self; 3] = [Self::Resources, Self::Tools, Self::Prompts];

    /// Directory backing the family, relative to the base directory.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::Tools => "tools",
            Self::Prompts => "prompts",
        }
    }

    /// Singular name used in log and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resources => "resource",
            Self::Tools => "tool",
            Self::Prompts => "prompt",
        }
    }
}

impl fmt::Display for CapabilityFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle and dispatch contract shared by the capability managers.
///
/// Implementors supply the catalog listing and the family-specific
/// execution step; directory bootstrap comes for free.
#[async_trait]
pub trait CapabilityManager: Send + Sync {
    /// Catalog returned by [`CapabilityManager::list`].
    type Catalog: Send;

    /// Input of [`CapabilityManager::execute`].
    type Request: Send + 'static;

    /// Output of [`CapabilityManager::execute`].
    type Output: Send;

    /// Family this manager serves.
    const FAMILY: CapabilityFamily;

    /// Directory backing the family.
    const DIRECTORY: &'static str = Self::FAMILY.directory();

    /// Gateway used for every file access.
    fn gateway(&self) -> &FileGateway;

    /// Ensures the family directory exists, creating it when listing fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the directory can neither be listed
    /// nor created.
    async fn initialize(&self) -> Result<()> {
        ensure_directory(self.gateway(), Self::FAMILY).await
    }

    /// Releases resources held by the manager. No-op by default.
    ///
    /// # Errors
    ///
    /// Implementations may fail; the default never does.
    async fn cleanup(&self) -> Result<()> {
        Ok(())
    }

    /// Lists the family's catalog. Cursors are accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be built.
    async fn list(&self, cursor: Option<String>) -> Result<Self::Catalog>;

    /// Runs the family-specific operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    async fn execute(&self, request: Self::Request) -> Result<Self::Output>;
}

/// Lists `family`'s directory and creates it when the listing fails.
async fn ensure_directory(gateway: &FileGateway, family: CapabilityFamily) -> Result<()> {
    let directory = family.directory();
    if gateway
        .handle_operation(FileOperation::list(directory))
        .await
        .is_success()
    {
        return Ok(());
    }

    info!(%family, "{directory} directory not found, creating it");
    gateway
        .handle_operation(FileOperation::create_directory(directory))
        .await
        .into_result()
        .map(|_| ())
        .map_err(|e| {
            error!(%family, error = %e, "failed to create {directory} directory");
            Error::internal_with_source(format!("Failed to initialize {directory} directory"), e)
        })
}
