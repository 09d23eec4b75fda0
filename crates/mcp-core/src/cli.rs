//! CLI-specific types shared by the binaries.
//!
//! # Examples
//!
//! ```
//! use mcp_file_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format, OutputFormat::Json);
//!
//! assert!(ExitCode::SUCCESS.is_success());
//! assert_eq!(ExitCode::ACCESS_DENIED.as_i32(), 3);
//! ```

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// CLI output format.
///
/// All formats carry the same information with different presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// The response in its JSON wire shape
    Json,
    /// Bare payload, suitable for pipes
    Text,
    /// Colorized status line plus payload
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Name accepted by `--format`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::invalid_input(format!(
                "invalid output format: '{s}' (expected: json, text, or pretty)"
            ))),
        }
    }
}

/// Process exit status of the operator CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// General or I/O error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Invalid input or arguments (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// Rejected by the sandbox policy (exit code 3).
    pub const ACCESS_DENIED: Self = Self(3);

    /// Target does not exist (exit code 4).
    pub const NOT_FOUND: Self = Self(4);

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Returns `true` for exit code 0.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Maps an error to the exit code that describes it.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_core::Error;
    /// use mcp_file_core::cli::ExitCode;
    ///
    /// let err = Error::ExtensionDenied { path: "a.exe".to_string() };
    /// assert_eq!(ExitCode::for_error(&err), ExitCode::ACCESS_DENIED);
    /// ```
    #[must_use]
    pub const fn for_error(error: &Error) -> Self {
        match error {
            Error::AccessDenied { .. } | Error::ExtensionDenied { .. } => Self::ACCESS_DENIED,
            Error::InvalidInput { .. } | Error::ConfigError { .. } => Self::INVALID_INPUT,
            Error::NotFound { .. } => Self::NOT_FOUND,
            Error::Internal { .. } | Error::NotConfigured | Error::Closed => Self::ERROR,
        }
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
