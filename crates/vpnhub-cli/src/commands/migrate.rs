//! Database migration command.

use crate::output;
use vpnhub_core::config::AppConfig;
use vpnhub_core::error::AppError;

/// Apply every pending migration to the configured PostgreSQL database.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    let Some(pool) = store.pool() else {
        return Err(AppError::configuration(
            "Migrations require database.provider = \"postgres\"",
        ));
    };

    println!("Running database migrations...");
    vpnhub_database::migration::run_migrations(pool.pool()).await?;
    store.close().await;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
