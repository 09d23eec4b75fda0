//! Types exchanged with MCP clients.
//!
//! These structs serialize to the camelCase JSON shapes of the MCP protocol.
//! The dispatcher produces them as `serde_json::Value`s, and the rmcp adapter
//! deserializes them into `rmcp::model` types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Resources
// ============================================================================

/// A file under the resources directory, materialized on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// `file://` URI of the backing file
    pub uri: String,

    /// File name
    pub name: String,

    /// Path relative to the gateway's base directory
    pub path: String,

    /// Mime type derived from the extension
    pub mime_type: String,

    /// Content length in bytes
    pub size: usize,

    /// Time the resource was materialized
    pub created_at: DateTime<Utc>,

    /// Time the resource was materialized
    pub updated_at: DateTime<Utc>,

    /// Human-readable description
    pub description: String,
}

impl Resource {
    /// Projects the resource to the `{name, uri}` pair sent to clients.
    #[must_use]
    pub fn summary(&self) -> ResourceSummary {
        ResourceSummary {
            name: self.name.clone(),
            uri: self.uri.clone(),
        }
    }
}

/// Entry of a `resources/list` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    /// File name
    pub name: String,
    /// `file://` URI
    pub uri: String,
}

/// Text contents of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    /// URI the client asked for
    pub uri: String,
    /// Mime type derived from the extension
    pub mime_type: String,
    /// File text
    pub text: String,
}

/// Naming pattern for a kind of resource.
///
/// Templates are descriptive only; nothing creates resources from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
    /// RFC 6570 style URI template
    pub uri_template: String,
    /// Display name
    pub name: String,
    /// What the template describes
    pub description: String,
    /// Mime type of matching resources
    pub mime_type: String,
}

// ============================================================================
// Tools
// ============================================================================

/// Static description of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name used in `tools/call`
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON Schema of the tool's arguments
    pub input_schema: Value,
    /// Behaviour hints
    pub annotations: ToolAnnotations,
}

/// Behaviour hints attached to a tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// The tool does not modify anything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,
    /// The tool may overwrite or delete data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destructive_hint: Option<bool>,
}

/// Content item of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
}

impl ToolContent {
    /// Creates a text item.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Returns the text of a text item.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Result of a tool call.
///
/// Tool failures are reported here with `is_error` set, never as protocol
/// errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    /// Result content
    pub content: Vec<ToolContent>,
    /// Set when the call failed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolOutput {
    /// A successful single-text result.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
        }
    }

    /// A failed single-text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(message)],
            is_error: true,
        }
    }

    /// Returns the text of the first content item.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.first().map(ToolContent::as_text)
    }
}

/// Arguments of the `readFile` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// Path to the file to read
    pub path: String,
}

/// Arguments of the `writeFile` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    /// Path to the file to write
    pub path: String,
    /// Content to write to the file
    pub content: String,
}

/// Arguments of the `listDirectory` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListDirectoryParams {
    /// Path to the directory to list
    pub path: String,
}

/// Arguments of the `deleteFile` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteFileParams {
    /// Path to the file to delete
    pub path: String,
}

// ============================================================================
// Prompts
// ============================================================================

/// Declared prompt argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Argument name, used as `{{name}}` in templates
    pub name: String,
    /// What the argument is for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether `prompts/get` must supply it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl PromptArgument {
    /// Reads a declared argument from definition JSON.
    ///
    /// `required` follows JSON truthiness, so `"yes"` or `1` count as set.
    /// Returns `None` when `name` is missing or not a string.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            name: value.get("name")?.as_str()?.to_string(),
            description: value
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            required: value.get("required").map(is_truthy),
        })
    }

    /// Returns `true` if the argument must be supplied.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are false.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Entry of a `prompts/list` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSummary {
    /// Prompt name
    pub name: String,
    /// What the prompt produces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgument>>,
}

/// Prompt definition as stored in `prompts/<name>.json`.
///
/// Built from the parsed file without a schema: fields of the wrong type
/// are treated as absent rather than rejecting the whole definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PromptDefinition {
    /// Prompt name, if the file carries a string one
    pub name: Option<String>,
    /// What the prompt produces; empty when absent or falsy
    pub description: String,
    /// Declared arguments in declaration order, when `arguments` is an array
    pub arguments: Option<Vec<PromptArgument>>,
    /// Message skeletons, each `{role, content}`
    pub message_templates: Vec<Value>,
}

impl PromptDefinition {
    /// Reads a definition from a parsed prompt file.
    ///
    /// A truthy non-string `description` is kept as its JSON text.
    /// Argument entries without a string `name` are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_server::types::PromptDefinition;
    /// use serde_json::json;
    ///
    /// let definition = PromptDefinition::from_value(&json!({
    ///     "description": 42,
    ///     "arguments": [{"name": "city", "required": "yes"}],
    /// }));
    /// assert!(definition.name.is_none());
    /// assert_eq!(definition.description, "42");
    /// assert!(definition.arguments.unwrap()[0].is_required());
    /// ```
    #[must_use]
    pub fn from_value(data: &Value) -> Self {
        let description = match data.get("description") {
            Some(Value::String(s)) => s.clone(),
            Some(other) if is_truthy(other) => other.to_string(),
            _ => String::new(),
        };

        let arguments = data.get("arguments").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(PromptArgument::from_value)
                .collect()
        });

        let message_templates = data
            .get("messageTemplates")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Self {
            name: data.get("name").and_then(Value::as_str).map(str::to_string),
            description,
            arguments,
            message_templates,
        }
    }
}

/// Rendered prompt returned by `prompts/get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResult {
    /// Prompt description, empty when the definition has none
    pub description: String,
    /// Rendered messages
    pub messages: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_output_omits_is_error_on_success() {
        let ok = serde_json::to_value(ToolOutput::success("done")).unwrap();
        assert_eq!(ok, json!({"content": [{"type": "text", "text": "done"}]}));

        let failed = serde_json::to_value(ToolOutput::error("boom")).unwrap();
        assert_eq!(failed["isError"], json!(true));
    }

    #[test]
    fn test_prompt_definition_defaults() {
        let definition = PromptDefinition::from_value(&json!({"name": "bare"}));
        assert_eq!(definition.name.as_deref(), Some("bare"));
        assert_eq!(definition.description, "");
        assert!(definition.arguments.is_none());
        assert!(definition.message_templates.is_empty());
    }

    #[test]
    fn test_prompt_definition_tolerates_wrong_types() {
        let definition = PromptDefinition::from_value(&json!({
            "name": 7,
            "description": false,
            "arguments": [{"name": "a", "required": 1}, {"required": true}, "b"],
            "messageTemplates": "not a list",
        }));
        assert!(definition.name.is_none());
        assert_eq!(definition.description, "");
        let arguments = definition.arguments.unwrap();
        assert_eq!(arguments.len(), 1);
        assert!(arguments[0].is_required());
        assert!(definition.message_templates.is_empty());
    }

    #[test]
    fn test_truthiness() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
        for value in [json!(true), json!(1), json!("no"), json!([]), json!({})] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn test_prompt_argument_required_defaults_to_false() {
        let argument: PromptArgument = serde_json::from_value(json!({"name": "city"})).unwrap();
        assert!(!argument.is_required());
    }

    #[test]
    fn test_resource_contents_camel_case() {
        let contents = ResourceContents {
            uri: "file://resources/a.txt".to_string(),
            mime_type: "text/plain".to_string(),
            text: "a".to_string(),
        };
        let value = serde_json::to_value(contents).unwrap();
        assert_eq!(value["mimeType"], json!("text/plain"));
    }
}
