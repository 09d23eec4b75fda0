//! `mcp-file-cli` entry point.

use anyhow::Result;
use clap::Parser;
use mcp_file_cli::Cli;
use mcp_file_cli::runner::{execute_command, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let exit_code = execute_command(cli).await?;

    std::process::exit(exit_code.as_i32());
}
