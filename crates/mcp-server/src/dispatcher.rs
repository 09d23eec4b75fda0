//! Request routing and configuration lifecycle.
//!
//! A [`Dispatcher`] starts `Unconfigured`, becomes `Configured` once a
//! [`FileConfig`] has been applied and the three managers initialized, and
//! ends `Closed`. Capability requests are only served while configured.

use crate::manager::{
    CapabilityFamily, CapabilityManager, PromptManager, PromptRequest, ResourceManager, ToolCall,
    ToolManager,
};
use crate::types::Resource;
use mcp_file_core::{Error, FileConfig, Result};
use mcp_file_gateway::FileGateway;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Name reported by `server/info`.
pub const SERVER_NAME: &str = "mcp-file-server";

/// Version reported by `server/info`.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A decoded request.
#[derive(Debug, Clone)]
pub enum Request {
    /// `server/info`
    ServerInfo,
    /// `config/set`
    SetConfiguration(FileConfig),
    /// `tools/list`
    ListTools {
        /// Ignored pagination cursor
        cursor: Option<String>,
    },
    /// `tools/call`
    CallTool(ToolCall),
    /// `resources/list`
    ListResources {
        /// Ignored pagination cursor
        cursor: Option<String>,
    },
    /// `resources/read`
    ReadResource {
        /// Resource URI
        uri: String,
    },
    /// `resources/templates/list`
    ListResourceTemplates,
    /// `prompts/list`
    ListPrompts {
        /// Ignored pagination cursor
        cursor: Option<String>,
    },
    /// `prompts/get`
    GetPrompt(PromptRequest),
}

#[derive(Debug, Default, Deserialize)]
struct PaginatedParams {
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConfigParams {
    config: FileConfig,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct GetPromptParams {
    name: String,
    #[serde(default)]
    arguments: Option<Map<String, Value>>,
}

impl Request {
    /// Decodes a request from its method name and JSON params.
    ///
    /// `server/config` is accepted as an alias of `config/set`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown method or params that
    /// do not match it.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_server::Request;
    /// use serde_json::json;
    ///
    /// let request = Request::parse("resources/read", Some(json!({"uri": "file://resources/a.txt"}))).unwrap();
    /// assert_eq!(request.method(), "resources/read");
    ///
    /// let err = Request::parse("files/rename", None).unwrap_err();
    /// assert_eq!(err.to_string(), "Unknown request kind: files/rename");
    /// ```
    pub fn parse(method: &str, params: Option<Value>) -> Result<Self> {
        match method {
            "server/info" => Ok(Self::ServerInfo),
            "config/set" | "server/config" => {
                let ConfigParams { config } = required(method, params)?;
                Ok(Self::SetConfiguration(config))
            }
            "tools/list" => Ok(Self::ListTools {
                cursor: optional::<PaginatedParams>(method, params)?.cursor,
            }),
            "tools/call" => {
                let CallToolParams { name, arguments } = required(method, params)?;
                Ok(Self::CallTool(ToolCall::new(
                    name,
                    arguments.unwrap_or_default(),
                )))
            }
            "resources/list" => Ok(Self::ListResources {
                cursor: optional::<PaginatedParams>(method, params)?.cursor,
            }),
            "resources/read" => {
                let ReadResourceParams { uri } = required(method, params)?;
                Ok(Self::ReadResource { uri })
            }
            "resources/templates/list" => Ok(Self::ListResourceTemplates),
            "prompts/list" => Ok(Self::ListPrompts {
                cursor: optional::<PaginatedParams>(method, params)?.cursor,
            }),
            "prompts/get" => {
                let GetPromptParams { name, arguments } = required(method, params)?;
                Ok(Self::GetPrompt(PromptRequest { name, arguments }))
            }
            other => Err(Error::invalid_input(format!("Unknown request kind: {other}"))),
        }
    }

    /// Canonical method name.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::ServerInfo => "server/info",
            Self::SetConfiguration(_) => "config/set",
            Self::ListTools { .. } => "tools/list",
            Self::CallTool(_) => "tools/call",
            Self::ListResources { .. } => "resources/list",
            Self::ReadResource { .. } => "resources/read",
            Self::ListResourceTemplates => "resources/templates/list",
            Self::ListPrompts { .. } => "prompts/list",
            Self::GetPrompt(_) => "prompts/get",
        }
    }

    /// Returns `true` for requests served only once configured.
    #[must_use]
    pub const fn requires_configuration(&self) -> bool {
        !matches!(self, Self::ServerInfo | Self::SetConfiguration(_))
    }
}

fn required<T: DeserializeOwned>(method: &str, params: Option<Value>) -> Result<T> {
    let params =
        params.ok_or_else(|| Error::invalid_input(format!("Missing parameters for {method}")))?;
    serde_json::from_value(params)
        .map_err(|e| Error::invalid_input(format!("Invalid parameters for {method}: {e}")))
}

fn optional<T: DeserializeOwned + Default>(method: &str, params: Option<Value>) -> Result<T> {
    match params {
        None | Some(Value::Null) => Ok(T::default()),
        params => required(method, params),
    }
}

/// The gateway and managers built from one configuration.
#[derive(Debug)]
pub struct Capabilities {
    config: FileConfig,
    resources: ResourceManager,
    tools: ToolManager,
    prompts: PromptManager,
}

impl Capabilities {
    /// Builds the managers and initializes them concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, or
    /// [`Error::Internal`] naming the first manager that fails to
    /// initialize.
    pub async fn initialize(config: FileConfig) -> Result<Self> {
        let gateway = FileGateway::new(&config)?;
        let capabilities = Self {
            resources: ResourceManager::new(gateway.clone()),
            tools: ToolManager::new(gateway.clone()),
            prompts: PromptManager::new(gateway),
            config,
        };

        tokio::try_join!(
            initialize_manager(&capabilities.resources),
            initialize_manager(&capabilities.tools),
            initialize_manager(&capabilities.prompts),
        )?;

        Ok(capabilities)
    }

    /// Returns the configuration the managers were built from.
    #[must_use]
    pub const fn config(&self) -> &FileConfig {
        &self.config
    }

    /// Returns the resource manager.
    #[must_use]
    pub const fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// Returns the tool manager.
    #[must_use]
    pub const fn tools(&self) -> &ToolManager {
        &self.tools
    }

    /// Returns the prompt manager.
    #[must_use]
    pub const fn prompts(&self) -> &PromptManager {
        &self.prompts
    }

    async fn cleanup(&self) -> Result<()> {
        tokio::try_join!(
            self.resources.cleanup(),
            self.tools.cleanup(),
            self.prompts.cleanup(),
        )?;
        Ok(())
    }
}

async fn initialize_manager<M: CapabilityManager>(manager: &M) -> Result<()> {
    manager.initialize().await.map_err(|e| {
        let family: CapabilityFamily = M::FAMILY;
        error!(%family, error = %e, "manager initialization failed");
        Error::internal_with_source(format!("Failed to initialize {family} manager: {e}"), e)
    })
}

#[derive(Debug)]
enum State {
    Unconfigured,
    Configured(Arc<Capabilities>),
    Closed,
}

/// Routes requests to the capability managers.
///
/// Safe to share across tasks; state transitions take a write lock, request
/// handling only a brief read lock.
///
/// # Examples
///
/// ```no_run
/// use mcp_file_core::FileConfig;
/// use mcp_file_server::Dispatcher;
/// use serde_json::json;
///
/// # async fn example() -> mcp_file_core::Result<()> {
/// let dispatcher = Dispatcher::new();
/// dispatcher
///     .configure(FileConfig::builder().allow_directory(".").allow_extension("txt").build())
///     .await?;
///
/// let tools = dispatcher.dispatch_raw("tools/list", None).await?;
/// assert_eq!(tools["tools"].as_array().map(Vec::len), Some(4));
///
/// dispatcher.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    state: RwLock<State>,
}

impl Dispatcher {
    /// Creates an unconfigured dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::Unconfigured),
        }
    }

    /// Creates a dispatcher and applies `config` immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the managers cannot be initialized.
    pub async fn with_config(config: FileConfig) -> Result<Self> {
        let dispatcher = Self::new();
        dispatcher.configure(config).await?;
        Ok(dispatcher)
    }

    /// Applies `config`, building and initializing the managers.
    ///
    /// On failure the dispatcher stays unconfigured.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if a configuration was already applied
    /// - [`Error::Closed`] after [`Dispatcher::close`]
    /// - [`Error::Internal`] if a manager fails to initialize
    pub async fn configure(&self, config: FileConfig) -> Result<()> {
        let mut state = self.state.write().await;
        match &*state {
            State::Configured(_) => {
                return Err(Error::invalid_input(
                    "Server is already configured; the sandbox policy cannot be changed",
                ));
            }
            State::Closed => return Err(Error::Closed),
            State::Unconfigured => {}
        }

        for warning in config.warnings() {
            warn!("{warning}");
        }

        let capabilities = Capabilities::initialize(config).await?;
        info!(
            directories = ?capabilities.config().allowed_directories,
            extensions = ?capabilities.config().normalized_extensions(),
            containment = %capabilities.config().containment,
            "server configured"
        );
        *state = State::Configured(Arc::new(capabilities));
        Ok(())
    }

    /// Returns `true` once a configuration has been applied and the
    /// dispatcher is not closed.
    pub async fn is_configured(&self) -> bool {
        let state = self.state.read().await;
        matches!(*state, State::Configured(_))
    }

    /// Returns the active managers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] or [`Error::Closed`] outside the
    /// configured state.
    pub async fn capabilities(&self) -> Result<Arc<Capabilities>> {
        let state = self.state.read().await;
        match &*state {
            State::Configured(capabilities) => Ok(Arc::clone(capabilities)),
            State::Unconfigured => Err(Error::NotConfigured),
            State::Closed => Err(Error::Closed),
        }
    }

    /// Decodes and handles a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be decoded or handled.
    pub async fn dispatch_raw(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let request = Request::parse(method, params)?;
        self.dispatch(request).await
    }

    /// Handles a request, producing its MCP-shaped JSON result.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConfigured`] / [`Error::Closed`] for capability
    ///   requests outside the configured state
    /// - whatever the target manager reports
    pub async fn dispatch(&self, request: Request) -> Result<Value> {
        let method = request.method();
        debug!(method, "dispatching request");

        let result = self.route(request).await;
        if let Err(e) = &result {
            warn!(method, error = %e, "request failed");
        }
        result
    }

    async fn route(&self, request: Request) -> Result<Value> {
        match request {
            Request::ServerInfo => Ok(json!({
                "name": SERVER_NAME,
                "version": SERVER_VERSION,
            })),
            Request::SetConfiguration(config) => {
                self.configure(config).await?;
                Ok(json!({ "success": true }))
            }
            Request::ListTools { cursor } => {
                let tools = self.capabilities().await?.tools().list(cursor).await?;
                Ok(json!({ "tools": tools }))
            }
            Request::CallTool(call) => {
                let output = self.capabilities().await?.tools().execute(call).await?;
                Ok(serde_json::to_value(output)?)
            }
            Request::ListResources { cursor } => {
                let resources = self.capabilities().await?.resources().list(cursor).await?;
                let summaries: Vec<_> = resources.iter().map(Resource::summary).collect();
                Ok(json!({ "resources": summaries }))
            }
            Request::ReadResource { uri } => {
                let contents = self.capabilities().await?.resources().execute(uri).await?;
                Ok(json!({ "contents": contents }))
            }
            Request::ListResourceTemplates => {
                let capabilities = self.capabilities().await?;
                Ok(json!({
                    "resourceTemplates": capabilities.resources().list_resource_templates()
                }))
            }
            Request::ListPrompts { cursor } => {
                let prompts = self.capabilities().await?.prompts().list(cursor).await?;
                Ok(json!({ "prompts": prompts }))
            }
            Request::GetPrompt(request) => {
                let result = self.capabilities().await?.prompts().execute(request).await?;
                Ok(serde_json::to_value(result)?)
            }
        }
    }

    /// Runs every manager's cleanup and moves to the closed state.
    ///
    /// Idempotent: later calls return `Ok(())` without running cleanup
    /// again.
    ///
    /// # Errors
    ///
    /// Returns the first cleanup failure; the dispatcher is closed anyway.
    pub async fn close(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let previous = std::mem::replace(&mut *state, State::Closed);
        drop(state);

        match previous {
            State::Configured(capabilities) => {
                info!("closing dispatcher");
                capabilities.cleanup().await
            }
            State::Unconfigured => {
                info!("closing unconfigured dispatcher");
                Ok(())
            }
            State::Closed => Ok(()),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
