//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use vpnhub_core::config::AppConfig;
use vpnhub_core::error::AppError;
use vpnhub_core::types::UserId;
use vpnhub_entity::user::UserRole;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Change a user's role
    SetRole {
        /// User ID
        id: String,
        /// New role (`user` or `admin`)
        role: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    role: String,
    created_at: String,
    last_login: String,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    match &args.command {
        UserCommand::List => {
            let users = store.users.find_all().await?;

            let rows: Vec<UserRow> = users
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    email: u.email.clone(),
                    name: u.name.clone(),
                    role: u.role.to_string(),
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    last_login: u
                        .last_login
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect();

            output::print_list(&rows, format);
        }
        UserCommand::SetRole { id, role } => {
            let role: UserRole = role.parse()?;
            let user_id = UserId::new(id.as_str());

            if !store.users.update_role(&user_id, role).await? {
                return Err(AppError::not_found(format!("User '{id}' not found")));
            }

            output::print_success(&format!("User '{id}' is now {role}"));
        }
    }

    store.close().await;
    Ok(())
}
