//! MCP protocol adapter.
//!
//! [`FileServerService`] implements rmcp's `ServerHandler` by forwarding
//! each request to the [`Dispatcher`] and converting the JSON result into
//! the corresponding `rmcp::model` type.

use crate::dispatcher::{Dispatcher, Request, SERVER_NAME, SERVER_VERSION};
use crate::manager::{PromptRequest, ToolCall};
use mcp_file_core::Error;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, GetPromptRequestParam, GetPromptResult, Implementation,
    ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ReadResourceRequestParam, ReadResourceResult,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

/// MCP server backed by a [`Dispatcher`].
///
/// # Examples
///
/// ```no_run
/// use mcp_file_core::FileConfig;
/// use mcp_file_server::{Dispatcher, FileServerService};
/// use rmcp::ServiceExt;
/// use rmcp::transport::stdio;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = FileConfig::builder().allow_directory(".").allow_extension("txt").build();
/// let dispatcher = Arc::new(Dispatcher::with_config(config).await?);
///
/// let service = FileServerService::new(dispatcher).serve(stdio()).await?;
/// service.waiting().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileServerService {
    dispatcher: Arc<Dispatcher>,
}

impl FileServerService {
    /// Creates a service forwarding to `dispatcher`.
    #[must_use]
    pub const fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    async fn forward<T: DeserializeOwned>(&self, request: Request) -> Result<T, McpError> {
        let value = self.dispatcher.dispatch(request).await.map_err(to_mcp_error)?;
        from_value(value)
    }
}

/// Maps a dispatcher error onto an MCP error code.
#[must_use]
pub fn to_mcp_error(error: Error) -> McpError {
    let message = error.to_string();
    match error {
        Error::InvalidInput { .. } => McpError::invalid_params(message, None),
        Error::NotFound { .. } => McpError::resource_not_found(message, None),
        Error::NotConfigured | Error::Closed => McpError::invalid_request(message, None),
        _ => McpError::internal_error(message, None),
    }
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, McpError> {
    serde_json::from_value(value).map_err(|e| {
        McpError::internal_error(format!("Failed to convert result: {e}"), None)
    })
}

/// Flattens prompt templates into MCP messages.
///
/// A template whose `content` is an array becomes one message per item,
/// each carrying the template's role. Other templates pass through.
#[must_use]
pub fn flatten_prompt_messages(messages: Vec<Value>) -> Vec<Value> {
    messages
        .into_iter()
        .flat_map(|message| match message.get("content") {
            Some(Value::Array(items)) => {
                let role = message.get("role").cloned().unwrap_or(Value::Null);
                items
                    .iter()
                    .map(|item| json!({ "role": role, "content": item }))
                    .collect()
            }
            _ => vec![message],
        })
        .collect()
}

impl ServerHandler for FileServerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Sandboxed filesystem access. Use the readFile, writeFile, listDirectory and \
                 deleteFile tools for files inside the allowed directories; browse \
                 resources/ as resources and prompts/ as prompt templates."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        self.forward(Request::ListTools {
            cursor: request.and_then(|r| r.cursor),
        })
        .await
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let call = ToolCall::new(request.name.into_owned(), request.arguments.unwrap_or_default());
        self.forward(Request::CallTool(call)).await
    }

    async fn list_resources(
        &self,
        request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        self.forward(Request::ListResources {
            cursor: request.and_then(|r| r.cursor),
        })
        .await
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.forward(Request::ReadResource { uri: request.uri }).await
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        self.forward(Request::ListResourceTemplates).await
    }

    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        self.forward(Request::ListPrompts {
            cursor: request.and_then(|r| r.cursor),
        })
        .await
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let mut value = self
            .dispatcher
            .dispatch(Request::GetPrompt(PromptRequest {
                name: request.name,
                arguments: request.arguments,
            }))
            .await
            .map_err(to_mcp_error)?;

        if let Some(Value::Array(messages)) = value.get_mut("messages") {
            let flattened = flatten_prompt_messages(std::mem::take(messages));
            *messages = flattened;
        }
        from_value(value)
    }
}
