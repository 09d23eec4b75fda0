//! Error types for the MCP file server.
//!
//! A single error hierarchy is shared by the sandbox policy, the file gateway,
//! the capability managers, and the dispatcher. The display strings of the
//! sandbox variants are part of the gateway's response contract, so they are
//! fixed and carry no path information; the offending path is kept in the
//! variant for logging.
//!
//! # Examples
//!
//! ```
//! use mcp_file_core::{Error, Result};
//!
//! fn require_content(content: Option<&str>) -> Result<&str> {
//!     content
//!         .filter(|c| !c.is_empty())
//!         .ok_or_else(|| Error::invalid_input("Content is required for write operation"))
//! }
//!
//! let err = require_content(None).unwrap_err();
//! assert!(err.is_invalid_input());
//! assert_eq!(err.to_string(), "Content is required for write operation");
//! ```

use std::io;
use std::path::Path;
use thiserror::Error;

/// Main error type for the MCP file server.
#[derive(Error, Debug)]
pub enum Error {
    /// The resolved path is outside every allowed directory.
    #[error("Access to this directory is not allowed")]
    AccessDenied {
        /// Path as supplied by the caller
        path: String,
    },

    /// The file extension is not in the allow-list.
    #[error("File type not allowed")]
    ExtensionDenied {
        /// Path as supplied by the caller
        path: String,
    },

    /// A required field or argument is missing or malformed.
    ///
    /// Raised for a write without content, a missing required prompt
    /// argument, undecodable tool parameters, or an unknown request kind.
    #[error("{message}")]
    InvalidInput {
        /// Human-readable description of the problem
        message: String,
    },

    /// The target of a read or lookup does not exist.
    #[error("Not found: {resource}")]
    NotFound {
        /// Identifier of the missing file, prompt, or resource
        resource: String,
    },

    /// Unexpected failure: I/O, JSON parsing, or directory initialization.
    #[error("{message}")]
    Internal {
        /// Human-readable description of the failure
        message: String,
        /// Underlying error cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A capability request arrived before any configuration was applied.
    #[error("Server is not configured: send a configuration request first")]
    NotConfigured,

    /// A request arrived after the dispatcher was closed.
    #[error("Server has been shut down")]
    Closed,

    /// Invalid sandbox configuration.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidInput`] from a message.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an [`Error::Internal`] without an underlying cause.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an [`Error::Internal`] wrapping an underlying cause.
    #[must_use]
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Classifies an I/O failure on `path`.
    ///
    /// A missing file or directory becomes [`Error::NotFound`]; everything
    /// else becomes [`Error::Internal`] with the I/O error as its source.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_core::Error;
    /// use std::io;
    ///
    /// let missing = io::Error::from(io::ErrorKind::NotFound);
    /// assert!(Error::from_io("a.txt", missing).is_not_found());
    ///
    /// let denied = io::Error::from(io::ErrorKind::PermissionDenied);
    /// assert!(Error::from_io("a.txt", denied).is_internal());
    /// ```
    #[must_use]
    pub fn from_io(path: impl AsRef<Path>, err: io::Error) -> Self {
        let path = path.as_ref().display().to_string();
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound { resource: path }
        } else {
            Self::Internal {
                message: format!("{path}: {err}"),
                source: Some(Box::new(err)),
            }
        }
    }

    /// Returns `true` if the path was outside the allowed directories.
    #[must_use]
    pub const fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    /// Returns `true` if the extension was outside the allow-list.
    #[must_use]
    pub const fn is_extension_denied(&self) -> bool {
        matches!(self, Self::ExtensionDenied { .. })
    }

    /// Returns `true` for either sandbox rejection.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_core::Error;
    ///
    /// let err = Error::ExtensionDenied { path: "a.exe".to_string() };
    /// assert!(err.is_sandbox_violation());
    /// assert!(!Error::NotConfigured.is_sandbox_violation());
    /// ```
    #[must_use]
    pub const fn is_sandbox_violation(&self) -> bool {
        self.is_access_denied() || self.is_extension_denied()
    }

    /// Returns `true` if this is an invalid input error.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns `true` if the dispatcher has not been configured yet.
    #[must_use]
    pub const fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }

    /// Returns `true` if the dispatcher has been shut down.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::internal_with_source(format!("JSON error: {err}"), err)
    }
}

/// Result type alias for file server operations.
pub type Result<T> = std::result::Result<T, Error>;
