//! Output formatters for gateway responses.
//!
//! The same [`FileResponse`] is rendered three ways: JSON for machines,
//! plain text for pipes, and colorized text for terminals.

use anyhow::Result;
use colored::Colorize;
use mcp_file_core::cli::OutputFormat;
use mcp_file_core::{FileData, FileOperation, FileResponse};

/// Formats the response to `operation` according to `format`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use mcp_file_cli::formatters::format_response;
/// use mcp_file_core::cli::OutputFormat;
/// use mcp_file_core::{FileData, FileOperation, FileResponse};
///
/// let op = FileOperation::read("notes.txt");
/// let response = FileResponse::with_data(FileData::Text("hello".to_string()));
///
/// let output = format_response(&op, &response, OutputFormat::Json)?;
/// assert!(output.contains("\"data\": \"hello\""));
///
/// let output = format_response(&op, &response, OutputFormat::Text)?;
/// assert_eq!(output, "hello");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_response(
    operation: &FileOperation,
    response: &FileResponse,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(response),
        OutputFormat::Text => Ok(text::format(operation, response)),
        OutputFormat::Pretty => Ok(pretty::format(operation, response)),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{FileResponse, Result};

    /// Formats the response in its wire shape, pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format(response: &FileResponse) -> Result<String> {
        Ok(serde_json::to_string_pretty(response)?)
    }
}

/// Plain text output formatting.
///
/// File contents are printed verbatim and listings one entry per line,
/// so the output can be piped straight into other tools.
pub mod text {
    use super::{FileData, FileOperation, FileResponse};

    /// Formats the response without colors or decoration.
    #[must_use]
    pub fn format(operation: &FileOperation, response: &FileResponse) -> String {
        match response {
            FileResponse::Success {
                data: Some(FileData::Text(text)),
            } => text.clone(),
            FileResponse::Success {
                data: Some(FileData::Entries(entries)),
            } => entries.join("\n"),
            FileResponse::Success { data: None } => {
                format!("ok: {} {}", operation.kind(), operation.path())
            }
            FileResponse::Failure { error } => format!("error: {error}"),
        }
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, FileData, FileOperation, FileResponse};

    /// Formats the response with colors and a status line.
    #[must_use]
    pub fn format(operation: &FileOperation, response: &FileResponse) -> String {
        let target = format!("{} {}", operation.kind(), operation.path());

        match response {
            FileResponse::Success { data } => {
                let mut out = format!("{} {}", "✓".green().bold(), target.bold());
                match data {
                    Some(FileData::Text(text)) if text.is_empty() => {
                        out.push_str(&format!("\n{}", "(empty file)".dimmed()));
                    }
                    Some(FileData::Text(text)) => {
                        out.push('\n');
                        out.push_str(text);
                    }
                    Some(FileData::Entries(entries)) if entries.is_empty() => {
                        out.push_str(&format!("\n{}", "(empty directory)".dimmed()));
                    }
                    Some(FileData::Entries(entries)) => {
                        for entry in entries {
                            out.push_str(&format!("\n  {}", entry.cyan()));
                        }
                    }
                    None => {}
                }
                out
            }
            FileResponse::Failure { error } => format!(
                "{} {}\n  {}",
                "✗".red().bold(),
                target.bold(),
                error.to_string().red()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_file_core::Error;

    fn listing() -> FileResponse {
        FileResponse::with_data(FileData::Entries(vec![
            "a.txt".to_string(),
            "b.md".to_string(),
        ]))
    }

    #[test]
    fn test_json_format_is_wire_shape() {
        let output = json::format(&listing()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": true, "data": ["a.txt", "b.md"]})
        );
    }

    #[test]
    fn test_json_format_failure() {
        let response = FileResponse::failure(Error::ExtensionDenied {
            path: "a.exe".to_string(),
        });
        let output = json::format(&response).unwrap();
        assert!(output.contains("\"success\": false"));
        assert!(output.contains("File type not allowed"));
    }

    #[test]
    fn test_text_format_listing() {
        let output = text::format(&FileOperation::list("."), &listing());
        assert_eq!(output, "a.txt\nb.md");
    }

    #[test]
    fn test_text_format_without_data() {
        let output = text::format(&FileOperation::delete("old.txt"), &FileResponse::success());
        assert_eq!(output, "ok: delete old.txt");
    }

    #[test]
    fn test_text_format_failure() {
        let response = FileResponse::failure(Error::AccessDenied {
            path: "/etc/passwd".to_string(),
        });
        let output = text::format(&FileOperation::read("/etc/passwd"), &response);
        assert_eq!(output, "error: Access to this directory is not allowed");
    }

    #[test]
    fn test_pretty_format() {
        let output = pretty::format(&FileOperation::list("docs"), &listing());
        assert!(output.contains("docs"));
        assert!(output.contains("a.txt"));
        assert!(output.contains("b.md"));

        let empty = FileResponse::with_data(FileData::Text(String::new()));
        let output = pretty::format(&FileOperation::read("a.txt"), &empty);
        assert!(output.contains("(empty file)"));
    }

    #[test]
    fn test_format_response_dispatches_on_format() {
        let op = FileOperation::read("a.txt");
        let response = FileResponse::with_data(FileData::Text("body".to_string()));

        assert_eq!(
            format_response(&op, &response, OutputFormat::Text).unwrap(),
            "body"
        );
        assert!(
            format_response(&op, &response, OutputFormat::Json)
                .unwrap()
                .contains("\"success\": true")
        );
        assert!(
            format_response(&op, &response, OutputFormat::Pretty)
                .unwrap()
                .contains("body")
        );
    }
}
