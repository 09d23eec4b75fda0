//! Request and response vocabulary of the file gateway.
//!
//! A [`FileOperation`] names one of five primitive operations on a
//! caller-supplied path. The gateway answers every operation with a
//! [`FileResponse`], which serializes to the uniform
//! `{success, data?, error?}` shape.

use crate::{Error, Result};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The five primitive gateway operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Read a file as UTF-8 text
    Read,
    /// Create or overwrite a file
    Write,
    /// List the entry names of a directory
    List,
    /// Remove a file
    Delete,
    /// Create a directory and all missing ancestors
    CreateDirectory,
}

impl OperationKind {
    /// Returns the wire name of the operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_core::OperationKind;
    ///
    /// assert_eq!(OperationKind::CreateDirectory.as_str(), "createDirectory");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::List => "list",
            Self::Delete => "delete",
            Self::CreateDirectory => "createDirectory",
        }
    }

    /// Returns `true` if the extension allow-list applies to this operation.
    ///
    /// Directory operations are gated by the path check only.
    #[must_use]
    pub const fn checks_extension(&self) -> bool {
        matches!(self, Self::Read | Self::Write | Self::Delete)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "list" => Ok(Self::List),
            "delete" => Ok(Self::Delete),
            "createDirectory" | "mkdir" => Ok(Self::CreateDirectory),
            _ => Err(Error::invalid_input("Invalid operation type")),
        }
    }
}

/// A single gateway operation.
///
/// Serialized with a `type` tag, matching the JSON accepted by
/// `FileGateway::handle_value`:
///
/// ```
/// use mcp_file_core::FileOperation;
///
/// let op: FileOperation = serde_json::from_value(serde_json::json!({
///     "type": "write",
///     "path": "notes.txt",
///     "content": "hello",
/// }))
/// .unwrap();
/// assert_eq!(op, FileOperation::write("notes.txt", "hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FileOperation {
    /// Read a file
    Read {
        /// Caller-supplied path, possibly relative
        path: String,
    },
    /// Write a file; `content` must be present and non-empty
    Write {
        /// Caller-supplied path, possibly relative
        path: String,
        /// Text to write
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    /// List a directory
    List {
        /// Caller-supplied path, possibly relative
        path: String,
    },
    /// Delete a file
    Delete {
        /// Caller-supplied path, possibly relative
        path: String,
    },
    /// Create a directory recursively
    #[serde(alias = "mkdir")]
    CreateDirectory {
        /// Caller-supplied path, possibly relative
        path: String,
    },
}

impl FileOperation {
    /// Builds an operation from its kind, path, and optional content.
    ///
    /// `content` is only kept for [`OperationKind::Write`].
    #[must_use]
    pub fn new(kind: OperationKind, path: impl Into<String>, content: Option<String>) -> Self {
        let path = path.into();
        match kind {
            OperationKind::Read => Self::Read { path },
            OperationKind::Write => Self::Write { path, content },
            OperationKind::List => Self::List { path },
            OperationKind::Delete => Self::Delete { path },
            OperationKind::CreateDirectory => Self::CreateDirectory { path },
        }
    }

    /// Shorthand for [`FileOperation::Read`].
    #[must_use]
    pub fn read(path: impl Into<String>) -> Self {
        Self::Read { path: path.into() }
    }

    /// Shorthand for [`FileOperation::Write`] with content.
    #[must_use]
    pub fn write(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            content: Some(content.into()),
        }
    }

    /// Shorthand for [`FileOperation::List`].
    #[must_use]
    pub fn list(path: impl Into<String>) -> Self {
        Self::List { path: path.into() }
    }

    /// Shorthand for [`FileOperation::Delete`].
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::Delete { path: path.into() }
    }

    /// Shorthand for [`FileOperation::CreateDirectory`].
    #[must_use]
    pub fn create_directory(path: impl Into<String>) -> Self {
        Self::CreateDirectory { path: path.into() }
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Read { .. } => OperationKind::Read,
            Self::Write { .. } => OperationKind::Write,
            Self::List { .. } => OperationKind::List,
            Self::Delete { .. } => OperationKind::Delete,
            Self::CreateDirectory { .. } => OperationKind::CreateDirectory,
        }
    }

    /// Returns the caller-supplied path.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Read { path }
            | Self::Write { path, .. }
            | Self::List { path }
            | Self::Delete { path }
            | Self::CreateDirectory { path } => path,
        }
    }
}

/// Payload of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileData {
    /// File contents returned by `read`
    Text(String),
    /// Directory entry names returned by `list`, in filesystem order
    Entries(Vec<String>),
}

impl FileData {
    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Entries(_) => None,
        }
    }

    /// Returns the directory entries, if any.
    #[must_use]
    pub fn as_entries(&self) -> Option<&[String]> {
        match self {
            Self::Entries(entries) => Some(entries),
            Self::Text(_) => None,
        }
    }

    /// Returns `true` for empty text or an empty listing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Entries(entries) => entries.is_empty(),
        }
    }
}

/// Uniform gateway result.
///
/// Exactly one of success-with-optional-data or failure-with-error holds.
///
/// # Examples
///
/// ```
/// use mcp_file_core::{Error, FileData, FileResponse};
///
/// let ok = FileResponse::with_data(FileData::Text("hi".to_string()));
/// assert_eq!(
///     serde_json::to_value(&ok).unwrap(),
///     serde_json::json!({"success": true, "data": "hi"})
/// );
///
/// let failed = FileResponse::failure(Error::AccessDenied { path: "/etc".to_string() });
/// assert_eq!(
///     serde_json::to_value(&failed).unwrap(),
///     serde_json::json!({"success": false, "error": "Access to this directory is not allowed"})
/// );
/// ```
#[derive(Debug)]
pub enum FileResponse {
    /// The operation completed
    Success {
        /// Payload for `read` and `list`; `None` otherwise
        data: Option<FileData>,
    },
    /// The operation was rejected or failed
    Failure {
        /// Typed cause of the failure
        error: Error,
    },
}

impl FileResponse {
    /// A successful response without payload.
    #[must_use]
    pub const fn success() -> Self {
        Self::Success { data: None }
    }

    /// A successful response carrying `data`.
    #[must_use]
    pub const fn with_data(data: FileData) -> Self {
        Self::Success { data: Some(data) }
    }

    /// A failed response.
    #[must_use]
    pub const fn failure(error: Error) -> Self {
        Self::Failure { error }
    }

    /// Returns `true` if the operation succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the payload of a successful response.
    #[must_use]
    pub const fn data(&self) -> Option<&FileData> {
        match self {
            Self::Success { data } => data.as_ref(),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the error of a failed response.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success { .. } => None,
        }
    }

    /// Returns the text payload of a successful `read`.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.data().and_then(FileData::as_text)
    }

    /// Returns the entries of a successful `list`.
    #[must_use]
    pub fn entries(&self) -> Option<&[String]> {
        self.data().and_then(FileData::as_entries)
    }

    /// Converts into a `Result`, for callers that propagate with `?`.
    ///
    /// # Errors
    ///
    /// Returns the carried error if the operation failed.
    pub fn into_result(self) -> Result<Option<FileData>> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { error } => Err(error),
        }
    }
}

impl From<Result<Option<FileData>>> for FileResponse {
    fn from(result: Result<Option<FileData>>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(error) => Self::Failure { error },
        }
    }
}

impl Serialize for FileResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Success { data: Some(data) } => {
                let mut state = serializer.serialize_struct("FileResponse", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            Self::Success { data: None } => {
                let mut state = serializer.serialize_struct("FileResponse", 1)?;
                state.serialize_field("success", &true)?;
                state.end()
            }
            Self::Failure { error } => {
                let mut state = serializer.serialize_struct("FileResponse", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &error.to_string())?;
                state.end()
            }
        }
    }
}
