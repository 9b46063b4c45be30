//! CLI command definitions and dispatch.

pub mod migrate;
pub mod reconcile;
pub mod seed;
pub mod server;
pub mod session;
pub mod user;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use vpnhub_core::config::{AppConfig, DEFAULT_ENV};
use vpnhub_core::error::AppError;
use vpnhub_database::Store;

/// VPN Hub administration tool
#[derive(Debug, Parser)]
#[command(name = "vpnhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Configuration overlay (`config/{env}.toml`)
    #[arg(short, long, env = "VPNHUB_ENV", default_value = DEFAULT_ENV)]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Insert the sample server catalog if no servers exist
    Seed,
    /// Server catalog
    Servers(server::ServerArgs),
    /// User management
    Users(user::UserArgs),
    /// Recompute server connection counters from active connections
    Reconcile,
    /// Session maintenance
    Sessions(session::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;

        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Seed => seed::execute(&config).await,
            Commands::Servers(args) => server::execute(args, &config, self.format).await,
            Commands::Users(args) => user::execute(args, &config, self.format).await,
            Commands::Reconcile => reconcile::execute(&config, self.format).await,
            Commands::Sessions(args) => session::execute(args, &config).await,
        }
    }
}

/// Helper: open the configured store
pub async fn open_store(config: &AppConfig) -> Result<Store, AppError> {
    Store::connect(&config.database).await
}
