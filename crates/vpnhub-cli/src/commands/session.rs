//! Session maintenance CLI commands.

use clap::{Args, Subcommand};

use crate::output;
use vpnhub_auth::SessionCleanup;
use vpnhub_core::config::AppConfig;
use vpnhub_core::error::AppError;

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Delete expired sessions
    Purge,
}

/// Execute session commands
pub async fn execute(args: &SessionArgs, config: &AppConfig) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    match &args.command {
        SessionCommand::Purge => {
            let removed = SessionCleanup::new(store.sessions.clone())
                .run_cleanup()
                .await?;
            output::print_success(&format!("Removed {removed} expired sessions"));
        }
    }

    store.close().await;
    Ok(())
}
