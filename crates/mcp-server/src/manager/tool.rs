//! Tool manager: a fixed catalog of file operations.

use super::{CapabilityFamily, CapabilityManager};
use crate::subscription::{Subscribers, Subscription};
use crate::types::{
    DeleteFileParams, ListDirectoryParams, ReadFileParams, ToolAnnotations, ToolDefinition,
    ToolOutput, WriteFileParams,
};
use async_trait::async_trait;
use mcp_file_core::{Error, FileData, FileOperation, Result};
use mcp_file_gateway::FileGateway;
use schemars::{JsonSchema, schema_for};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::error::Error as _;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// The tools served by [`ToolManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileTool {
    /// Read a file
    ReadFile,
    /// Create or overwrite a file
    WriteFile,
    /// List a directory
    ListDirectory,
    /// Delete a file
    DeleteFile,
}

impl FileTool {
    /// Catalog order.
    pub const ALL: [Self; 4] = [
        Self::ReadFile,
        Self::WriteFile,
        Self::ListDirectory,
        Self::DeleteFile,
    ];

    /// Wire name of the tool.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReadFile => "readFile",
            Self::WriteFile => "writeFile",
            Self::ListDirectory => "listDirectory",
            Self::DeleteFile => "deleteFile",
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ReadFile => "Read a file from the filesystem",
            Self::WriteFile => "Write content to a file",
            Self::ListDirectory => "List contents of a directory",
            Self::DeleteFile => "Delete a file from the filesystem",
        }
    }

    /// Behaviour hints advertised to clients.
    #[must_use]
    pub const fn annotations(self) -> ToolAnnotations {
        match self {
            Self::ReadFile | Self::ListDirectory => ToolAnnotations {
                read_only_hint: Some(true),
                destructive_hint: None,
            },
            Self::WriteFile | Self::DeleteFile => ToolAnnotations {
                read_only_hint: None,
                destructive_hint: Some(true),
            },
        }
    }

    /// JSON Schema of the tool's arguments.
    #[must_use]
    pub fn input_schema(self) -> Value {
        match self {
            Self::ReadFile => schema_of::<ReadFileParams>(),
            Self::WriteFile => schema_of::<WriteFileParams>(),
            Self::ListDirectory => schema_of::<ListDirectoryParams>(),
            Self::DeleteFile => schema_of::<DeleteFileParams>(),
        }
    }

    /// Full catalog entry.
    #[must_use]
    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
            annotations: self.annotations(),
        }
    }
}

impl fmt::Display for FileTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileTool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| Error::internal(format!("Unknown tool: {s}")))
    }
}

fn schema_of<T: JsonSchema>() -> Value {
    schema_for!(T).to_value()
}

/// A `tools/call` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Tool name
    pub name: String,
    /// Tool arguments, decoded per tool
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    /// Creates a call with the given arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Executes the file tools through the gateway.
#[derive(Debug)]
pub struct ToolManager {
    gateway: FileGateway,
    list_changed: Subscribers<()>,
}

impl ToolManager {
    /// Creates a manager over `gateway`.
    #[must_use]
    pub fn new(gateway: FileGateway) -> Self {
        Self {
            gateway,
            list_changed: Subscribers::new(),
        }
    }

    /// Returns the tool catalog.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        FileTool::ALL.into_iter().map(FileTool::definition).collect()
    }

    /// Runs a tool, reporting every failure inside the output.
    ///
    /// The error text includes the underlying cause when there is one,
    /// e.g. `Failed to read file: a.exe: File type not allowed`.
    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> ToolOutput {
        match self.execute_tool(name, arguments).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = name, error = %e, "tool call failed");
                let message = match e.source() {
                    Some(cause) => format!("{e}: {cause}"),
                    None => e.to_string(),
                };
                ToolOutput::error(message)
            }
        }
    }

    /// Runs a tool, propagating failures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown tool or undecodable
    /// arguments, and [`Error::Internal`] when the file operation fails.
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutput> {
        let tool: FileTool = name.parse()?;
        debug!(%tool, "executing tool");

        match tool {
            FileTool::ReadFile => {
                let ReadFileParams { path } = decode(tool, arguments)?;
                let response = self.gateway.handle_operation(FileOperation::read(&path)).await;
                let data = response
                    .into_result()
                    .map_err(|e| operation_failed("read file", &path, e))?;
                let text = data
                    .as_ref()
                    .and_then(FileData::as_text)
                    .unwrap_or_default();
                Ok(ToolOutput::success(text))
            }
            FileTool::WriteFile => {
                let WriteFileParams { path, content } = decode(tool, arguments)?;
                self.gateway
                    .handle_operation(FileOperation::write(&path, content))
                    .await
                    .into_result()
                    .map_err(|e| operation_failed("write file", &path, e))?;
                Ok(ToolOutput::success(format!(
                    "Successfully wrote to file: {path}"
                )))
            }
            FileTool::ListDirectory => {
                let ListDirectoryParams { path } = decode(tool, arguments)?;
                let data = self
                    .gateway
                    .handle_operation(FileOperation::list(&path))
                    .await
                    .into_result()
                    .map_err(|e| operation_failed("list directory", &path, e))?;
                let entries = data
                    .as_ref()
                    .and_then(FileData::as_entries)
                    .unwrap_or_default();
                Ok(ToolOutput::success(serde_json::to_string_pretty(entries)?))
            }
            FileTool::DeleteFile => {
                let DeleteFileParams { path } = decode(tool, arguments)?;
                self.gateway
                    .handle_operation(FileOperation::delete(&path))
                    .await
                    .into_result()
                    .map_err(|e| operation_failed("delete file", &path, e))?;
                Ok(ToolOutput::success(format!(
                    "Successfully deleted file: {path}"
                )))
            }
        }
    }

    /// Registers a callback for tool-list changes.
    pub fn on_tool_list_changed<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&()) + Send + Sync + 'static,
    {
        self.list_changed.subscribe(callback)
    }

    /// Returns the tool-list registry.
    #[must_use]
    pub const fn list_changed(&self) -> &Subscribers<()> {
        &self.list_changed
    }
}

fn decode<T: DeserializeOwned>(tool: FileTool, arguments: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| Error::invalid_input(format!("Invalid arguments for {tool}: {e}")))
}

fn operation_failed(verb: &str, path: &str, cause: Error) -> Error {
    Error::internal_with_source(format!("Failed to {verb}: {path}"), cause)
}

#[async_trait]
impl CapabilityManager for ToolManager {
    type Catalog = Vec<ToolDefinition>;
    type Request = ToolCall;
    type Output = ToolOutput;

    const FAMILY: CapabilityFamily = CapabilityFamily::Tools;

    fn gateway(&self) -> &FileGateway {
        &self.gateway
    }

    async fn list(&self, _cursor: Option<String>) -> Result<Self::Catalog> {
        Ok(self.list_tools())
    }

    async fn execute(&self, call: ToolCall) -> Result<Self::Output> {
        Ok(self.call_tool(&call.name, call.arguments).await)
    }
}
