//! Command executor for dispatching CLI commands
//!
//! Entry point once arguments are parsed and settings are merged.

use super::handlers::ServeCommandHandler;
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppError;

/// Dispatch the parsed command
///
/// No subcommand means `serve` with configured defaults.
///
/// # Errors
/// Returns argument validation errors, or whatever the command handler fails with
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
    }
}

fn validate_command_args(cli: &Cli) -> Result<(), AppError> {
    cli.validate()
        .map_err(|message| AppError::BadRequest { message })?;

    if let Some(Commands::Serve {
        host: Some(host_addr),
        port: Some(port_num),
        ..
    }) = &cli.command
        && *port_num < 1024
        && host_addr == "0.0.0.0"
    {
        tracing::warn!(
            port = port_num,
            "Binding to 0.0.0.0 on a privileged port typically requires root privileges"
        );
    }

    Ok(())
}
