//! Command-line arguments of the `mcp-file-server` binary.

use clap::Parser;
use mcp_file_core::{Containment, FileConfig, Result};
use mcp_file_gateway::resolve_lexically;
use std::path::PathBuf;

/// MCP server exposing a sandboxed filesystem.
#[derive(Parser, Debug)]
#[command(name = "mcp-file-server")]
#[command(version, about, long_about = None)]
#[command(after_help = "Example:\n  mcp-file-server ./workspace ./docs --extensions txt,md,json")]
pub struct ServerArgs {
    /// Directories the server may access
    #[arg(value_name = "DIR")]
    pub directories: Vec<PathBuf>,

    /// Comma-separated list of allowed file extensions (e.g. txt,md,json)
    #[arg(long, value_name = "EXT1,EXT2,...")]
    pub extensions: String,

    /// Directory containment mode: ancestor (path segments) or prefix (raw string)
    #[arg(long, default_value_t = Containment::Ancestor)]
    pub containment: Containment,

    /// Directory relative paths are resolved against (default: working directory)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
}

impl ServerArgs {
    /// Builds the sandbox configuration.
    ///
    /// Directory arguments are made absolute against the working directory;
    /// the base directory, when given, likewise.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined or
    /// the resulting configuration is invalid.
    pub fn into_config(self) -> Result<FileConfig> {
        let cwd = std::env::current_dir().map_err(|e| {
            mcp_file_core::Error::internal_with_source("Failed to determine working directory", e)
        })?;

        let mut builder = FileConfig::builder()
            .allow_extensions(FileConfig::parse_extension_list(&self.extensions))
            .containment(self.containment);
        for dir in &self.directories {
            builder = builder.allow_directory(resolve_lexically(&cwd, dir));
        }
        if let Some(base) = &self.base_dir {
            builder = builder.base_dir(resolve_lexically(&cwd, base));
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }

    /// Extensions for display, each with a leading dot.
    #[must_use]
    pub fn display_extensions(&self) -> Vec<String> {
        FileConfig::parse_extension_list(&self.extensions)
            .into_iter()
            .map(|ext| format!(".{ext}"))
            .collect()
    }
}
