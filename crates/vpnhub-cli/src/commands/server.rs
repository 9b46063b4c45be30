//! Server catalog CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use vpnhub_core::config::AppConfig;
use vpnhub_core::error::AppError;

/// Arguments for server commands
#[derive(Debug, Args)]
pub struct ServerArgs {
    /// Server subcommand
    #[command(subcommand)]
    pub command: ServerCommand,
}

/// Server subcommands
#[derive(Debug, Subcommand)]
pub enum ServerCommand {
    /// List all servers
    List,
}

/// Server display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ServerRow {
    id: String,
    name: String,
    location: String,
    ip_address: String,
    status: String,
    load: i32,
    connections: String,
}

/// Execute server commands
pub async fn execute(
    args: &ServerArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    match &args.command {
        ServerCommand::List => {
            let servers = store.servers.find_all().await?;

            let rows: Vec<ServerRow> = servers
                .iter()
                .map(|s| ServerRow {
                    id: s.id.to_string(),
                    name: s.name.clone(),
                    location: format!("{}, {}", s.city, s.country),
                    ip_address: s.ip_address.clone(),
                    status: s.status.to_string(),
                    load: s.load,
                    connections: format!("{}/{}", s.current_connections, s.max_connections),
                })
                .collect();

            output::print_list(&rows, format);
        }
    }

    store.close().await;
    Ok(())
}
