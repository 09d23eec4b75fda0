//! Sandbox configuration.
//!
//! A [`FileConfig`] lists the directories and file extensions the gateway may
//! touch. Empty lists are legal and mean "deny all". The configuration is
//! immutable once a gateway has been built from it.
//!
//! # Examples
//!
//! ```
//! use mcp_file_core::{Containment, FileConfig};
//!
//! let config: FileConfig = serde_json::from_value(serde_json::json!({
//!     "allowedDirectories": ["/srv/data"],
//!     "allowedExtensions": ["txt", ".JSON"],
//! }))
//! .unwrap();
//!
//! assert_eq!(config.containment, Containment::Ancestor);
//! assert_eq!(config.normalized_extensions(), vec!["txt", "json"]);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How a resolved path is matched against an allowed directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Containment {
    /// The allowed directory must be a whole-segment ancestor of the path.
    #[default]
    Ancestor,
    /// Raw string-prefix test on the resolved paths.
    ///
    /// `/a/b` admits `/a/bc` under this mode. Kept for compatibility with
    /// deployments that rely on it.
    Prefix,
}

impl Containment {
    /// Returns the configuration name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ancestor => "ancestor",
            Self::Prefix => "prefix",
        }
    }
}

impl fmt::Display for Containment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Containment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ancestor" => Ok(Self::Ancestor),
            "prefix" => Ok(Self::Prefix),
            _ => Err(Error::ConfigError {
                message: format!("invalid containment mode: '{s}' (expected: ancestor or prefix)"),
            }),
        }
    }
}

/// Sandbox allow-lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// Directories under which operations are permitted.
    ///
    /// Relative entries are resolved against `base_dir`.
    pub allowed_directories: Vec<PathBuf>,

    /// Permitted file extensions, with or without a leading dot.
    pub allowed_extensions: Vec<String>,

    /// Directory containment mode.
    /// Default: [`Containment::Ancestor`]
    #[serde(default)]
    pub containment: Containment,

    /// Directory relative caller paths are resolved against.
    /// Default: the process working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl FileConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_core::{Containment, FileConfig};
    ///
    /// let config = FileConfig::builder()
    ///     .allow_directory("/srv/data")
    ///     .allow_extensions(["txt", "md"])
    ///     .containment(Containment::Prefix)
    ///     .build();
    ///
    /// assert_eq!(config.allowed_extensions.len(), 2);
    /// ```
    #[must_use]
    pub fn builder() -> FileConfigBuilder {
        FileConfigBuilder::new()
    }

    /// Returns the allowed extensions, normalized and de-duplicated.
    ///
    /// Malformed entries are dropped; see [`normalize_extension`].
    #[must_use]
    pub fn normalized_extensions(&self) -> Vec<String> {
        let mut seen = Vec::with_capacity(self.allowed_extensions.len());
        for ext in self.allowed_extensions.iter().filter_map(|e| normalize_extension(e)) {
            if !seen.contains(&ext) {
                seen.push(ext);
            }
        }
        seen
    }

    /// Returns `true` if no operation can ever pass the sandbox.
    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        self.allowed_directories.is_empty()
    }

    /// Parses a comma-separated extension list as given on the command line.
    ///
    /// Entries are trimmed and normalized; malformed entries are discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_core::FileConfig;
    ///
    /// let exts = FileConfig::parse_extension_list(" .txt, md ,, ../x, JSON");
    /// assert_eq!(exts, vec!["txt", "md", "json"]);
    /// ```
    #[must_use]
    pub fn parse_extension_list(raw: &str) -> Vec<String> {
        Self {
            allowed_extensions: raw.split(',').map(str::to_string).collect(),
            ..Self::default()
        }
        .normalized_extensions()
    }

    /// Validates the configuration.
    ///
    /// Empty allow-lists are accepted (deny-all); use [`FileConfig::warnings`]
    /// to surface them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if:
    /// - an allowed directory entry is empty
    /// - `base_dir` is set but not absolute
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_file_core::FileConfig;
    ///
    /// let config = FileConfig::builder().allow_directory("").build();
    /// assert!(config.validate().is_err());
    ///
    /// assert!(FileConfig::default().validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self
            .allowed_directories
            .iter()
            .any(|dir| dir.as_os_str().is_empty())
        {
            return Err(Error::ConfigError {
                message: "allowed directory entries cannot be empty".to_string(),
            });
        }

        if let Some(base) = &self.base_dir
            && !base.is_absolute()
        {
            return Err(Error::ConfigError {
                message: format!("base directory must be absolute: {}", base.display()),
            });
        }

        Ok(())
    }

    /// Returns non-fatal problems worth reporting at startup.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.allowed_directories.is_empty() {
            warnings.push("No allowed directories specified; every operation will be denied".to_string());
        }

        let normalized = self.normalized_extensions();
        if normalized.is_empty() {
            warnings.push(
                "No valid extensions specified; every file operation will be denied".to_string(),
            );
        } else if normalized.len() < self.allowed_extensions.len() {
            warnings.push(format!(
                "{} extension entries were malformed or duplicated and ignored",
                self.allowed_extensions.len() - normalized.len()
            ));
        }

        warnings
    }
}

/// Builder for [`FileConfig`].
#[derive(Debug, Default)]
pub struct FileConfigBuilder {
    config: FileConfig,
}

impl FileConfigBuilder {
    /// Creates an empty (deny-all) builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an allowed directory.
    #[must_use]
    pub fn allow_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.allowed_directories.push(dir.into());
        self
    }

    /// Adds an allowed extension.
    #[must_use]
    pub fn allow_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.allowed_extensions.push(ext.into());
        self
    }

    /// Adds several allowed extensions.
    #[must_use]
    pub fn allow_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .allowed_extensions
            .extend(exts.into_iter().map(Into::into));
        self
    }

    /// Sets the containment mode.
    #[must_use]
    pub const fn containment(mut self, containment: Containment) -> Self {
        self.config.containment = containment;
        self
    }

    /// Sets the directory relative paths are resolved against.
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = Some(dir.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> FileConfig {
        self.config
    }
}

/// Normalizes one extension entry.
///
/// Trims whitespace, strips a single leading dot and lowercases. Returns
/// `None` for entries that can never match a file extension: empty entries,
/// and entries containing dots, path separators, or whitespace.
///
/// # Examples
///
/// ```
/// use mcp_file_core::normalize_extension;
///
/// assert_eq!(normalize_extension(".TXT").as_deref(), Some("txt"));
/// assert_eq!(normalize_extension("md").as_deref(), Some("md"));
/// assert_eq!(normalize_extension("."), None);
/// assert_eq!(normalize_extension("tar.gz"), None);
/// assert_eq!(normalize_extension("a/b"), None);
/// ```
#[must_use]
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let ext = trimmed.strip_prefix('.').unwrap_or(trimmed);

    let malformed = ext.is_empty()
        || ext
            .chars()
            .any(|c| c == '.' || c == '/' || c == '\\' || c.is_whitespace());
    if malformed {
        return None;
    }

    Some(ext.to_lowercase())
}
