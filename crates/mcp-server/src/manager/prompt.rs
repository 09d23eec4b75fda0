//! Prompt manager: JSON prompt definitions under `prompts/`.

use super::{CapabilityFamily, CapabilityManager};
use crate::subscription::{Subscribers, Subscription};
use crate::template;
use crate::types::{PromptDefinition, PromptResult, PromptSummary};
use async_trait::async_trait;
use mcp_file_core::{Error, FileOperation, Result};
use mcp_file_gateway::FileGateway;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

const DEFINITION_EXTENSION: &str = ".json";

/// A `prompts/get` request.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    /// Prompt name, the file stem under `prompts/`
    pub name: String,
    /// Values for the declared arguments
    pub arguments: Option<Map<String, Value>>,
}

/// Lists and renders prompt definitions stored as JSON files.
#[derive(Debug)]
pub struct PromptManager {
    gateway: FileGateway,
    list_changed: Subscribers<()>,
}

impl PromptManager {
    /// Creates a manager over `gateway`.
    #[must_use]
    pub fn new(gateway: FileGateway) -> Self {
        Self {
            gateway,
            list_changed: Subscribers::new(),
        }
    }

    /// Returns the definition path for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `name` is empty or could escape
    /// the prompts directory.
    pub fn prompt_path(name: &str) -> Result<String> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(Error::invalid_input(format!("Invalid prompt name: {name}")));
        }
        Ok(format!("{}/{name}{DEFINITION_EXTENSION}", Self::DIRECTORY))
    }

    /// Lists every well-formed prompt definition.
    ///
    /// Files that cannot be read or parsed, or that lack a string `name`,
    /// are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the directory itself cannot be listed.
    pub async fn list_prompts(&self, _cursor: Option<String>) -> Result<Vec<PromptSummary>> {
        let directory = Self::DIRECTORY;
        let entries = self
            .gateway
            .handle_operation(FileOperation::list(directory))
            .await
            .into_result()
            .map_err(|e| {
                error!(error = %e, "failed to list prompts directory");
                Error::internal_with_source("Failed to list prompts", e)
            })?
            .and_then(|data| data.as_entries().map(<[String]>::to_vec))
            .unwrap_or_default();

        let mut prompts = Vec::new();
        for file in entries
            .iter()
            .filter(|f| f.ends_with(DEFINITION_EXTENSION))
        {
            let path = format!("{directory}/{file}");
            let response = self.gateway.handle_operation(FileOperation::read(&path)).await;
            let Some(text) = response.text().filter(|t| !t.is_empty()) else {
                warn!(path = %path, "skipping unreadable prompt file");
                continue;
            };

            let data: Value = match serde_json::from_str(text) {
                Ok(data) => data,
                Err(e) => {
                    warn!(path = %path, error = %e, "skipping malformed prompt file");
                    continue;
                }
            };

            match summarize(&data) {
                Some(summary) => prompts.push(summary),
                None => warn!(path = %path, "skipping prompt without a string name"),
            }
        }

        Ok(prompts)
    }

    /// Loads a prompt and expands its templates with `arguments`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for a malformed name or a missing required
    ///   argument
    /// - [`Error::Internal`] if the definition is missing, empty, or invalid
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<&Map<String, Value>>,
    ) -> Result<PromptResult> {
        let path = Self::prompt_path(name)?;
        let response = self.gateway.handle_operation(FileOperation::read(&path)).await;

        let text = match response.into_result() {
            Ok(Some(data)) if !data.is_empty() => data.as_text().unwrap_or_default().to_string(),
            Ok(_) => return Err(Error::internal(format!("Prompt {name} not found"))),
            Err(e) => {
                return Err(Error::internal_with_source(
                    format!("Prompt {name} not found"),
                    e,
                ));
            }
        };

        let data: Value = serde_json::from_str(&text).map_err(|e| {
            error!(prompt = name, error = %e, "failed to parse prompt definition");
            Error::internal_with_source(format!("Failed to process prompt {name}"), e)
        })?;
        let definition = PromptDefinition::from_value(&data);

        let declared = definition.arguments.as_deref().unwrap_or_default();
        template::check_required_arguments(declared, arguments)?;

        debug!(
            prompt = name,
            templates = definition.message_templates.len(),
            "rendering prompt"
        );
        Ok(PromptResult {
            messages: template::render_messages(&definition.message_templates, arguments),
            description: definition.description,
        })
    }

    /// Registers a callback for prompt-list changes.
    pub fn on_prompt_list_changed<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&()) + Send + Sync + 'static,
    {
        self.list_changed.subscribe(callback)
    }

    /// Returns the prompt-list registry.
    #[must_use]
    pub const fn list_changed(&self) -> &Subscribers<()> {
        &self.list_changed
    }
}

/// Projects a parsed definition file to its listing entry.
fn summarize(data: &Value) -> Option<PromptSummary> {
    let definition = PromptDefinition::from_value(data);
    Some(PromptSummary {
        name: definition.name?,
        description: Some(definition.description).filter(|d| !d.is_empty()),
        arguments: definition.arguments,
    })
}

#[async_trait]
impl CapabilityManager for PromptManager {
    type Catalog = Vec<PromptSummary>;
    type Request = PromptRequest;
    type Output = PromptResult;

    const FAMILY: CapabilityFamily = CapabilityFamily::Prompts;

    fn gateway(&self) -> &FileGateway {
        &self.gateway
    }

    async fn list(&self, cursor: Option<String>) -> Result<Self::Catalog> {
        self.list_prompts(cursor).await
    }

    async fn execute(&self, request: PromptRequest) -> Result<Self::Output> {
        self.get_prompt(&request.name, request.arguments.as_ref())
            .await
    }
}
