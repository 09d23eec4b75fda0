//! Placeholder expansion for prompt message templates.
//!
//! Templates reference arguments as `{{name}}`. Supplied arguments are
//! substituted everywhere they occur; placeholders left over afterwards are
//! removed, so optional arguments that were not supplied vanish from the
//! output.

use crate::types::PromptArgument;
use mcp_file_core::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Matches any placeholder, non-greedy so adjacent ones stay separate.
static LEFTOVER_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*?\}\}").expect("valid regex"));

/// Checks that every required argument is present, in declaration order.
///
/// A key that is present counts as supplied, even when its value is `null`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming the first missing argument.
pub fn check_required_arguments(
    declared: &[PromptArgument],
    arguments: Option<&Map<String, Value>>,
) -> Result<()> {
    for argument in declared.iter().filter(|a| a.is_required()) {
        if !arguments.is_some_and(|args| args.contains_key(&argument.name)) {
            return Err(Error::invalid_input(format!(
                "Missing required argument: {}",
                argument.name
            )));
        }
    }
    Ok(())
}

/// Text substituted for an argument value.
///
/// Strings are used verbatim; every other value is rendered as JSON.
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Expands one text fragment.
///
/// Arguments are applied in the map's iteration order (sorted by key), so
/// a value that itself contains `{{other}}` is expanded only if `other`
/// sorts after it.
///
/// # Examples
///
/// ```
/// use mcp_file_server::template::render_text;
/// use serde_json::json;
///
/// let args = json!({"name": "Seoul"});
/// let text = render_text("Hello {{name}}, it is {{weather}}", args.as_object());
/// assert_eq!(text, "Hello Seoul, it is ");
/// ```
#[must_use]
pub fn render_text(text: &str, arguments: Option<&Map<String, Value>>) -> String {
    let mut rendered = text.to_string();
    for (key, value) in arguments.into_iter().flatten() {
        let placeholder = format!("{{{{{key}}}}}");
        if rendered.contains(&placeholder) {
            rendered = rendered.replace(&placeholder, &stringify(value));
        }
    }
    LEFTOVER_PLACEHOLDER.replace_all(&rendered, "").into_owned()
}

/// Expands one message template.
///
/// Only templates whose `content` is an array are expanded, and within it
/// only items with `"type": "text"` and a non-empty `text`. Everything else
/// passes through unchanged, including unknown fields.
#[must_use]
pub fn render_message(template: &Value, arguments: Option<&Map<String, Value>>) -> Value {
    let mut message = template.clone();
    if let Some(items) = message.get_mut("content").and_then(Value::as_array_mut) {
        for item in items.iter_mut() {
            if item.get("type").and_then(Value::as_str) != Some("text") {
                continue;
            }
            let Some(text) = item
                .get("text")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
            else {
                continue;
            };
            let rendered = render_text(text, arguments);
            item["text"] = Value::String(rendered);
        }
    }
    message
}

/// Expands every message template.
#[must_use]
pub fn render_messages(templates: &[Value], arguments: Option<&Map<String, Value>>) -> Vec<Value> {
    templates
        .iter()
        .map(|template| render_message(template, arguments))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declared(specs: &[(&str, bool)]) -> Vec<PromptArgument> {
        specs
            .iter()
            .map(|(name, required)| PromptArgument {
                name: (*name).to_string(),
                description: None,
                required: Some(*required),
            })
            .collect()
    }

    #[test]
    fn test_supplied_keys_replaced_globally() {
        let args = json!({"x": "1"});
        assert_eq!(render_text("{{x}}+{{x}}={{y}}", args.as_object()), "1+1=");
    }

    #[test]
    fn test_leftovers_removed_without_arguments() {
        assert_eq!(render_text("a {{b}} c {{d}}", None), "a  c ");
        assert_eq!(render_text("no placeholders", None), "no placeholders");
    }

    #[test]
    fn test_non_greedy_cleanup_keeps_text_between_placeholders() {
        assert_eq!(render_text("{{a}} keep {{b}}", None), " keep ");
    }

    #[test]
    fn test_non_string_values_render_as_json() {
        let args = json!({"n": 3, "ok": true, "nothing": null, "list": [1, 2]});
        let text = render_text("{{n}} {{ok}} {{nothing}} {{list}}", args.as_object());
        assert_eq!(text, "3 true null [1,2]");
    }

    #[test]
    fn test_replacement_is_literal() {
        let args = json!({"k": "$1 {{not_a_key}}"});
        assert_eq!(render_text("[{{k}}]", args.as_object()), "[$1 ]");
    }

    #[test]
    fn test_required_arguments_checked_in_declaration_order() {
        let declared = declared(&[("city", true), ("unit", false), ("date", true)]);

        let err = check_required_arguments(&declared, None).unwrap_err();
        assert_eq!(err.to_string(), "Missing required argument: city");

        let args = json!({"city": "Seoul"});
        let err = check_required_arguments(&declared, args.as_object()).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "Missing required argument: date");

        let args = json!({"city": "Seoul", "date": null});
        assert!(check_required_arguments(&declared, args.as_object()).is_ok());
    }

    #[test]
    fn test_render_message_touches_only_text_items() {
        let template = json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "Hi {{name}}", "extra": 1},
                {"type": "image", "data": "{{name}}", "mimeType": "image/png"},
                {"type": "text", "text": ""}
            ]
        });
        let args = json!({"name": "Ann"});

        let message = render_message(&template, args.as_object());
        assert_eq!(message["role"], json!("user"));
        assert_eq!(message["content"][0], json!({"type": "text", "text": "Hi Ann", "extra": 1}));
        assert_eq!(message["content"][1], template["content"][1]);
        assert_eq!(message["content"][2], template["content"][2]);
    }

    #[test]
    fn test_non_array_content_passes_through() {
        let template = json!({"role": "user", "content": {"type": "text", "text": "{{x}}"}});
        let args = json!({"x": "y"});
        assert_eq!(render_message(&template, args.as_object()), template);
    }
}
