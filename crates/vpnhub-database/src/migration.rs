//! Schema migrations embedded from the workspace `migrations/` directory.

use sqlx::PgPool;
use tracing::info;

use vpnhub_core::error::{AppError, ErrorKind};
use vpnhub_core::result::AppResult;

/// Apply every pending migration.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations applied");
    Ok(())
}
