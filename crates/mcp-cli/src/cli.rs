//! CLI structure and argument definitions.

use clap::{Args, Parser, Subcommand};
use mcp_file_core::{Containment, FileConfig, FileOperation};
use mcp_file_gateway::resolve_lexically;
use std::path::PathBuf;

/// Run a single sandboxed file operation.
///
/// Every operation is checked against the same directory and extension
/// allow-lists the MCP file server enforces.
#[derive(Parser, Debug)]
#[command(name = "mcp-file-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Operation to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Sandbox the operation runs in
    #[command(flatten)]
    pub sandbox: SandboxArgs,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    pub format: String,
}

/// Available operations.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the contents of a file.
    Read {
        /// File to read
        path: String,
    },

    /// Create or overwrite a file.
    ///
    /// # Examples
    ///
    /// ```bash
    /// mcp-file-cli --dir ./notes --extensions md write ./notes/todo.md "- buy milk"
    /// ```
    Write {
        /// File to write
        path: String,

        /// Text to write
        #[arg(allow_hyphen_values = true)]
        content: String,
    },

    /// List the entries of a directory.
    List {
        /// Directory to list
        path: String,
    },

    /// Delete a file.
    Delete {
        /// File to delete
        path: String,
    },

    /// Create a directory and any missing parents.
    Mkdir {
        /// Directory to create
        path: String,
    },
}

impl Commands {
    /// Converts the subcommand into the gateway operation it runs.
    #[must_use]
    pub fn into_operation(self) -> FileOperation {
        match self {
            Self::Read { path } => FileOperation::read(path),
            Self::Write { path, content } => FileOperation::write(path, content),
            Self::List { path } => FileOperation::list(path),
            Self::Delete { path } => FileOperation::delete(path),
            Self::Mkdir { path } => FileOperation::create_directory(path),
        }
    }
}

/// Sandbox settings shared by every operation.
#[derive(Args, Debug, Clone)]
pub struct SandboxArgs {
    /// Directory the operation may access (repeatable)
    #[arg(long = "dir", value_name = "DIR", global = true)]
    pub directories: Vec<PathBuf>,

    /// Comma-separated list of allowed file extensions (e.g. txt,md,json)
    #[arg(long, value_name = "EXT1,EXT2,...", global = true, default_value = "")]
    pub extensions: String,

    /// Directory containment mode: ancestor (path segments) or prefix (raw string)
    #[arg(long, global = true, default_value_t = Containment::Ancestor)]
    pub containment: Containment,

    /// Directory relative paths are resolved against (default: working directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub base_dir: Option<PathBuf>,
}

impl SandboxArgs {
    /// Builds the sandbox configuration, resolving every directory
    /// against `cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn to_config(&self, cwd: &std::path::Path) -> mcp_file_core::Result<FileConfig> {
        let mut builder = FileConfig::builder()
            .allow_extensions(FileConfig::parse_extension_list(&self.extensions))
            .containment(self.containment);
        for dir in &self.directories {
            builder = builder.allow_directory(resolve_lexically(cwd, dir));
        }
        builder = builder.base_dir(
            self.base_dir
                .as_ref()
                .map_or_else(|| cwd.to_path_buf(), |base| resolve_lexically(cwd, base)),
        );

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_file_core::OperationKind;
    use std::path::Path;

    #[test]
    fn test_cli_parsing_read() {
        let cli = Cli::parse_from([
            "mcp-file-cli",
            "--dir",
            "/srv",
            "--extensions",
            "txt",
            "read",
            "/srv/a.txt",
        ]);
        assert_eq!(
            cli.command,
            Commands::Read {
                path: "/srv/a.txt".to_string()
            }
        );
        assert_eq!(cli.sandbox.directories, [PathBuf::from("/srv")]);
        assert_eq!(cli.sandbox.extensions, "txt");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "mcp-file-cli",
            "write",
            "a.md",
            "hello",
            "--dir",
            "/a",
            "--dir",
            "/b",
            "--format",
            "json",
            "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.format, "json");
        assert_eq!(cli.sandbox.directories.len(), 2);
        assert_eq!(cli.command.into_operation().kind(), OperationKind::Write);
    }

    #[test]
    fn test_cli_output_format_default() {
        let cli = Cli::parse_from(["mcp-file-cli", "list", "."]);
        assert_eq!(cli.format, "pretty");
        assert!(!cli.verbose);
        assert_eq!(cli.sandbox.containment, Containment::Ancestor);
    }

    #[test]
    fn test_mkdir_maps_to_create_directory() {
        let cli = Cli::parse_from(["mcp-file-cli", "mkdir", "out/logs"]);
        let op = cli.command.into_operation();
        assert_eq!(op.kind(), OperationKind::CreateDirectory);
        assert_eq!(op.path(), "out/logs");
    }

    #[test]
    fn test_write_content_may_start_with_hyphen() {
        let cli = Cli::parse_from(["mcp-file-cli", "write", "todo.md", "- milk", "-v"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Write {
                path: "todo.md".to_string(),
                content: "- milk".to_string()
            }
        );
    }

    #[test]
    fn test_write_requires_content() {
        let err = Cli::try_parse_from(["mcp-file-cli", "write", "a.txt"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_config_resolves_against_cwd() {
        let cli = Cli::parse_from([
            "mcp-file-cli",
            "--dir",
            "data",
            "--extensions",
            ".TXT,md",
            "--containment",
            "prefix",
            "read",
            "data/a.txt",
        ]);
        let config = cli.sandbox.to_config(Path::new("/work")).unwrap();
        assert_eq!(config.allowed_directories, [PathBuf::from("/work/data")]);
        assert_eq!(config.allowed_extensions, ["txt", "md"]);
        assert_eq!(config.containment, Containment::Prefix);
        assert_eq!(config.base_dir, Some(PathBuf::from("/work")));
    }

    #[test]
    fn test_explicit_base_dir() {
        let cli = Cli::parse_from(["mcp-file-cli", "--base-dir", "sub", "list", "."]);
        let config = cli.sandbox.to_config(Path::new("/work")).unwrap();
        assert_eq!(config.base_dir, Some(PathBuf::from("/work/sub")));
        assert!(config.is_deny_all());
    }
}
