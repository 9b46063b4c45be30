//! Server repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use vpnhub_core::error::{AppError, ErrorKind};
use vpnhub_core::result::AppResult;
use vpnhub_core::types::ServerId;
use vpnhub_entity::server::{Server, ServerPatch, ServerStatus};

use crate::traits::ServerStore;

/// PostgreSQL-backed [`ServerStore`].
#[derive(Debug, Clone)]
pub struct ServerRepository {
    pool: PgPool,
}

impl ServerRepository {
    /// Create a new server repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServerStore for ServerRepository {
    async fn find_by_id(&self, id: &ServerId) -> AppResult<Option<Server>> {
        sqlx::query_as::<_, Server>("SELECT * FROM servers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find server", e))
    }

    async fn find_all(&self) -> AppResult<Vec<Server>> {
        sqlx::query_as::<_, Server>("SELECT * FROM servers ORDER BY created_at ASC, name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list servers", e))
    }

    async fn countries(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar("SELECT DISTINCT country FROM servers ORDER BY country")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list countries", e)
            })
    }

    async fn create(&self, server: &Server) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO servers (id, name, country, city, ip_address, status, load, \
             max_connections, current_connections, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&server.id)
        .bind(&server.name)
        .bind(&server.country)
        .bind(&server.city)
        .bind(&server.ip_address)
        .bind(server.status)
        .bind(server.load)
        .bind(server.max_connections)
        .bind(server.current_connections)
        .bind(server.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create server", e))?;
        Ok(())
    }

    async fn update(&self, id: &ServerId, patch: &ServerPatch) -> AppResult<Option<Server>> {
        sqlx::query_as::<_, Server>(
            "UPDATE servers SET \
                name = COALESCE($2, name), \
                country = COALESCE($3, country), \
                city = COALESCE($4, city), \
                ip_address = COALESCE($5, ip_address), \
                status = COALESCE($6, status), \
                load = COALESCE($7, load), \
                max_connections = COALESCE($8, max_connections) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.country)
        .bind(&patch.city)
        .bind(&patch.ip_address)
        .bind(patch.status)
        .bind(patch.load)
        .bind(patch.max_connections)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update server", e))
    }

    async fn delete(&self, id: &ServerId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM servers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete server", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_connection_count(&self, id: &ServerId, delta: i32) -> AppResult<()> {
        sqlx::query(
            "UPDATE servers SET current_connections = GREATEST(current_connections + $2, 0) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to adjust connection count", e)
        })?;
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM servers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count servers", e))
    }

    async fn count_by_status(&self, status: ServerStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM servers WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count servers by status", e)
            })
    }
}
