//! Connection ledger repository implementation.
//!
//! Each transition runs in one transaction holding a transaction-scoped
//! advisory lock on the user id. The partial unique index
//! `uq_connections_one_active_per_user` rejects a second active row even if
//! a caller bypasses the lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use vpnhub_core::error::{AppError, ErrorKind};
use vpnhub_core::result::AppResult;
use vpnhub_core::types::{ServerId, UserId};
use vpnhub_entity::connection::{Connection, ConnectionView, UNKNOWN_SERVER};

use crate::traits::{ConnectionStore, CounterDrift};

const UNIQUE_VIOLATION: &str = "23505";

const ADJUST_COUNTER: &str = "UPDATE servers \
     SET current_connections = GREATEST(current_connections + $2, 0) WHERE id = $1";

const CLAIM_SEAT: &str = "UPDATE servers \
     SET current_connections = current_connections + 1 \
     WHERE id = $1 AND (NOT $2 OR current_connections < max_connections)";

const SELECT_VIEW: &str = "SELECT c.*, \
     COALESCE(s.name, $2) AS server_name, COALESCE(s.country, $2) AS server_country \
     FROM connections c LEFT JOIN servers s ON s.id = c.server_id";

/// PostgreSQL-backed [`ConnectionStore`].
#[derive(Debug, Clone)]
pub struct ConnectionRepository {
    pool: PgPool,
}

impl ConnectionRepository {
    /// Create a new connection repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin_for_user(&self, user_id: &UserId) -> AppResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to lock user ledger", e)
            })?;

        Ok(tx)
    }

    /// Close the user's active connection inside `tx`.
    async fn close_in_tx(
        tx: &mut Transaction<'static, Postgres>,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Connection>> {
        let active = sqlx::query_as::<_, Connection>(
            "SELECT * FROM connections WHERE user_id = $1 AND status = 'active' FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active connection", e)
        })?;

        let Some(mut connection) = active else {
            return Ok(None);
        };
        if !connection.close(now) {
            return Ok(None);
        }

        let result = sqlx::query(
            "UPDATE connections SET status = $2, disconnected_at = $3, duration = $4 \
             WHERE id = $1 AND status = 'active'",
        )
        .bind(&connection.id)
        .bind(connection.status)
        .bind(connection.disconnected_at)
        .bind(connection.duration)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to close connection", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        adjust_in_tx(tx, &connection.server_id, -1).await?;
        Ok(Some(connection))
    }
}

async fn adjust_in_tx(
    tx: &mut Transaction<'static, Postgres>,
    server_id: &ServerId,
    delta: i32,
) -> AppResult<()> {
    sqlx::query(ADJUST_COUNTER)
        .bind(server_id)
        .bind(delta)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to adjust connection count", e)
        })?;
    Ok(())
}

async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
    tx.commit().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to commit ledger transition", e)
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

#[async_trait]
impl ConnectionStore for ConnectionRepository {
    async fn find_active(&self, user_id: &UserId) -> AppResult<Option<Connection>> {
        sqlx::query_as::<_, Connection>(
            "SELECT * FROM connections WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active connection", e)
        })
    }

    async fn find_active_view(&self, user_id: &UserId) -> AppResult<Option<ConnectionView>> {
        sqlx::query_as::<_, ConnectionView>(&format!(
            "{SELECT_VIEW} WHERE c.user_id = $1 AND c.status = 'active'"
        ))
        .bind(user_id)
        .bind(UNKNOWN_SERVER)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find current connection", e)
        })
    }

    async fn history(&self, user_id: &UserId, limit: i64) -> AppResult<Vec<ConnectionView>> {
        sqlx::query_as::<_, ConnectionView>(&format!(
            "{SELECT_VIEW} WHERE c.user_id = $1 ORDER BY c.connected_at DESC LIMIT $3"
        ))
        .bind(user_id)
        .bind(UNKNOWN_SERVER)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load connection history", e)
        })
    }

    async fn open(
        &self,
        connection: &Connection,
        enforce_capacity: bool,
    ) -> AppResult<Option<Connection>> {
        let mut tx = self.begin_for_user(&connection.user_id).await?;

        let superseded =
            Self::close_in_tx(&mut tx, &connection.user_id, connection.connected_at).await?;

        // The row lock taken by the conditional increment orders concurrent
        // connects to the same server; the superseded seat is already free.
        let claimed = sqlx::query(CLAIM_SEAT)
            .bind(&connection.server_id)
            .bind(enforce_capacity)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to adjust connection count", e)
            })?;
        // Dropping `tx` on either error rolls back the superseding close.
        if claimed.rows_affected() == 0 && enforce_capacity {
            return Err(AppError::invalid_state("Server is at capacity"));
        }
        if claimed.rows_affected() == 0 {
            return Err(AppError::not_found("Server not found"));
        }

        sqlx::query(
            "INSERT INTO connections (id, user_id, server_id, connected_at, disconnected_at, \
             duration, data_transferred, status) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&connection.id)
        .bind(&connection.user_id)
        .bind(&connection.server_id)
        .bind(connection.connected_at)
        .bind(connection.disconnected_at)
        .bind(connection.duration)
        .bind(connection.data_transferred)
        .bind(connection.status)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::with_source(
                    ErrorKind::Conflict,
                    "User already has an active connection",
                    e,
                )
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert connection", e)
            }
        })?;

        commit(tx).await?;

        debug!(
            connection_id = %connection.id,
            superseded = superseded.is_some(),
            "Connection opened"
        );
        Ok(superseded)
    }

    async fn close_active(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Connection>> {
        let mut tx = self.begin_for_user(user_id).await?;
        let closed = Self::close_in_tx(&mut tx, user_id, now).await?;
        commit(tx).await?;
        Ok(closed)
    }

    async fn count_active(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM connections WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count active connections", e)
            })
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM connections WHERE connected_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count recent connections", e)
            })
    }

    async fn reconcile_counters(&self) -> AppResult<Vec<CounterDrift>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Blocks ledger counter updates until commit.
        sqlx::query("SELECT id FROM servers ORDER BY id FOR UPDATE")
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock servers", e))?;

        let rows = sqlx::query_as::<_, (ServerId, String, i32, i32)>(
            "SELECT s.id, s.name, s.current_connections, COUNT(c.id)::INTEGER \
             FROM servers s \
             LEFT JOIN connections c ON c.server_id = s.id AND c.status = 'active' \
             GROUP BY s.id, s.name, s.current_connections \
             HAVING s.current_connections <> COUNT(c.id) \
             ORDER BY s.name",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute server counters", e)
        })?;

        let mut drifts = Vec::with_capacity(rows.len());
        for (server_id, server_name, recorded, actual) in rows {
            sqlx::query("UPDATE servers SET current_connections = $2 WHERE id = $1")
                .bind(&server_id)
                .bind(actual)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to correct server counter", e)
                })?;
            drifts.push(CounterDrift {
                server_id,
                server_name,
                recorded,
                actual,
            });
        }

        commit(tx).await?;
        Ok(drifts)
    }
}
