//! Command execution and runtime logic.

use anyhow::{Context, Result};
use mcp_file_core::cli::{ExitCode, OutputFormat};
use mcp_file_core::{FileConfig, FileOperation, FileResponse};
use mcp_file_gateway::FileGateway;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::formatters::format_response;

/// Initializes logging infrastructure.
///
/// Logs go to stderr so that command output on stdout stays clean.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}

/// Runs one operation inside the sandbox described by `config`.
///
/// # Errors
///
/// Returns an error if the sandbox policy cannot be built. Failures of the
/// operation itself are reported in the returned [`FileResponse`].
pub async fn run_operation(config: &FileConfig, operation: FileOperation) -> Result<FileResponse> {
    for warning in config.warnings() {
        warn!("{warning}");
    }

    let gateway = FileGateway::new(config).context("invalid sandbox configuration")?;
    Ok(gateway.handle_operation(operation).await)
}

/// Exit code describing a response.
#[must_use]
pub const fn exit_code_for(response: &FileResponse) -> ExitCode {
    match response.error() {
        Some(error) => ExitCode::for_error(error),
        None => ExitCode::SUCCESS,
    }
}

/// Executes the parsed command line and prints the formatted response.
///
/// # Errors
///
/// Returns an error if the output format or sandbox configuration is
/// invalid, or the response cannot be formatted.
pub async fn execute_command(cli: Cli) -> Result<ExitCode> {
    let format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let config = cli.sandbox.to_config(&cwd)?;

    let operation = cli.command.into_operation();
    debug!(kind = %operation.kind(), path = operation.path(), "running operation");

    let response = run_operation(&config, operation.clone()).await?;
    let output = format_response(&operation, &response, format)?;

    if response.is_success() {
        println!("{output}");
    } else {
        eprintln!("{output}");
    }

    Ok(exit_code_for(&response))
}
