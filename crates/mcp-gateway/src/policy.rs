//! Path and extension allow-list predicates.
//!
//! Paths are resolved lexically: relative paths are joined onto the base
//! directory, then `.` and `..` components are folded. Symlinks are not
//! followed, so the decision depends only on the path text and the
//! configuration.

use mcp_file_core::{Containment, Error, FileConfig, OperationKind, Result};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Fail-closed sandbox policy built from a [`FileConfig`].
///
/// # Examples
///
/// ```
/// use mcp_file_core::{Containment, FileConfig};
/// use mcp_file_gateway::SandboxPolicy;
///
/// let config = FileConfig::builder()
///     .allow_directory("/srv/data")
///     .allow_extension("txt")
///     .build();
/// let policy = SandboxPolicy::with_base_dir(&config, "/srv");
///
/// assert!(policy.is_path_allowed("data/notes.txt"));
/// assert!(!policy.is_path_allowed("data/../secrets/key.txt"));
/// assert!(!policy.is_path_allowed("/srv/database/x.txt"));
/// assert!(policy.is_extension_allowed("NOTES.TXT"));
/// ```
#[derive(Debug, Clone)]
pub struct SandboxPolicy {
    allowed_directories: Vec<PathBuf>,
    allowed_extensions: HashSet<String>,
    containment: Containment,
    base_dir: PathBuf,
}

impl SandboxPolicy {
    /// Builds a policy, resolving relative paths against `config.base_dir`
    /// or, when unset, the process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the working
    /// directory cannot be determined.
    pub fn new(config: &FileConfig) -> Result<Self> {
        config.validate()?;

        let base_dir = match &config.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| {
                Error::internal_with_source("Failed to determine working directory", e)
            })?,
        };

        Ok(Self::with_base_dir(config, base_dir))
    }

    /// Builds a policy with an explicit base directory, ignoring
    /// `config.base_dir`.
    #[must_use]
    pub fn with_base_dir(config: &FileConfig, base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let allowed_directories = config
            .allowed_directories
            .iter()
            .map(|dir| resolve_lexically(&base_dir, dir))
            .collect();

        Self {
            allowed_directories,
            allowed_extensions: config.normalized_extensions().into_iter().collect(),
            containment: config.containment,
            base_dir,
        }
    }

    /// Returns the directory relative paths are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the resolved allowed directories.
    #[must_use]
    pub fn allowed_directories(&self) -> &[PathBuf] {
        &self.allowed_directories
    }

    /// Returns the containment mode in effect.
    #[must_use]
    pub const fn containment(&self) -> Containment {
        self.containment
    }

    /// Resolves `path` to an absolute, lexically normalized path.
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve_lexically(&self.base_dir, path.as_ref())
    }

    /// Returns `true` if `path` resolves into at least one allowed directory.
    #[must_use]
    pub fn is_path_allowed(&self, path: impl AsRef<Path>) -> bool {
        let resolved = self.resolve(&path);
        let allowed = self
            .allowed_directories
            .iter()
            .any(|dir| self.contains(dir, &resolved));

        debug!(
            input = %path.as_ref().display(),
            resolved = %resolved.display(),
            containment = %self.containment,
            allowed,
            "checking path"
        );
        allowed
    }

    /// Returns `true` if the lowercase extension of `path` is allow-listed.
    ///
    /// Paths without an extension (including dotfiles such as `.gitkeep`)
    /// are never allowed.
    #[must_use]
    pub fn is_extension_allowed(&self, path: impl AsRef<Path>) -> bool {
        let extension = path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());
        let allowed = extension
            .as_deref()
            .is_some_and(|ext| self.allowed_extensions.contains(ext));

        debug!(
            path = %path.as_ref().display(),
            extension = extension.as_deref().unwrap_or(""),
            allowed,
            "checking extension"
        );
        allowed
    }

    /// Runs the checks that apply to `kind` and returns the resolved path.
    ///
    /// The path check runs first; the extension check only applies to
    /// file operations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccessDenied`] or [`Error::ExtensionDenied`],
    /// whichever check fails first.
    pub fn check(&self, path: &str, kind: OperationKind) -> Result<PathBuf> {
        if !self.is_path_allowed(path) {
            return Err(Error::AccessDenied {
                path: path.to_string(),
            });
        }

        if kind.checks_extension() && !self.is_extension_allowed(path) {
            return Err(Error::ExtensionDenied {
                path: path.to_string(),
            });
        }

        Ok(self.resolve(path))
    }

    fn contains(&self, dir: &Path, resolved: &Path) -> bool {
        match self.containment {
            Containment::Ancestor => resolved.starts_with(dir),
            Containment::Prefix => resolved
                .to_string_lossy()
                .starts_with(dir.to_string_lossy().as_ref()),
        }
    }
}

/// Joins `path` onto `base` when relative and folds `.` and `..`
/// components without touching the filesystem.
///
/// `..` at the root stays at the root.
///
/// # Examples
///
/// ```
/// use mcp_file_gateway::resolve_lexically;
/// use std::path::{Path, PathBuf};
///
/// let base = Path::new("/srv/app");
/// assert_eq!(resolve_lexically(base, Path::new("a/./b/../c")), PathBuf::from("/srv/app/a/c"));
/// assert_eq!(resolve_lexically(base, Path::new("/../../etc")), PathBuf::from("/etc"));
/// assert_eq!(resolve_lexically(base, Path::new("")), PathBuf::from("/srv/app"));
/// ```
#[must_use]
pub fn resolve_lexically(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(segment) => resolved.push(segment),
        }
    }
    resolved
}
