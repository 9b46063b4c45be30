//! Per-user connection state machine.
//!
//! A user is either Idle or Connected to exactly one server. `connect`
//! supersedes an existing connection; `disconnect` closes it. Both run
//! under a per-user async mutex, and each store call is one atomic unit
//! that moves the affected server counters together with the record.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use vpnhub_core::config::ConnectionConfig;
use vpnhub_core::error::{AppError, ErrorKind};
use vpnhub_core::result::AppResult;
use vpnhub_core::types::{ServerId, UserId};
use vpnhub_database::{ConnectionStore, ServerStore};
use vpnhub_entity::connection::{Connection, ConnectionView};

use crate::context::RequestContext;

/// Result of a successful connect.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectOutcome {
    /// The new active connection.
    pub connection: Connection,
    /// Name of the server connected to.
    pub server_name: String,
    /// The connection it replaced, closed with its duration set.
    pub superseded: Option<Connection>,
}

/// Owns connection records and their transitions.
#[derive(Debug, Clone)]
pub struct ConnectionLedger {
    servers: Arc<dyn ServerStore>,
    connections: Arc<dyn ConnectionStore>,
    locks: Arc<DashMap<UserId, Arc<Mutex<()>>>>,
    history_limit: i64,
    enforce_capacity: bool,
}

impl ConnectionLedger {
    /// Creates a new ledger.
    pub fn new(
        servers: Arc<dyn ServerStore>,
        connections: Arc<dyn ConnectionStore>,
        config: &ConnectionConfig,
    ) -> Self {
        Self {
            servers,
            connections,
            locks: Arc::new(DashMap::new()),
            history_limit: config.history_limit,
            enforce_capacity: config.enforce_capacity,
        }
    }

    fn user_lock(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn release_lock(&self, user_id: &UserId) {
        self.locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Connect the user to `server_id`, superseding any active connection.
    ///
    /// Fails with NotFound for an unknown server and InvalidState when the
    /// server is not online, or is full while capacity is enforced. A failed
    /// connect creates no record and leaves the previous connection active.
    pub async fn connect(
        &self,
        ctx: &RequestContext,
        server_id: &ServerId,
    ) -> AppResult<ConnectOutcome> {
        let lock = self.user_lock(&ctx.user_id);
        let result = {
            let _guard = lock.lock().await;
            self.connect_locked(&ctx.user_id, server_id).await
        };
        drop(lock);
        self.release_lock(&ctx.user_id);
        result
    }

    async fn connect_locked(
        &self,
        user_id: &UserId,
        server_id: &ServerId,
    ) -> AppResult<ConnectOutcome> {
        let server = self
            .servers
            .find_by_id(server_id)
            .await?
            .ok_or_else(|| AppError::not_found("Server not found"))?;

        if !server.status.accepts_connections() {
            warn!(
                user_id = %user_id,
                server_id = %server_id,
                status = %server.status,
                "Connect rejected: server not online"
            );
            return Err(AppError::invalid_state("Server is not available"));
        }

        let connection = Connection::open(user_id.clone(), server_id.clone(), Utc::now());
        let superseded = self
            .connections
            .open(&connection, self.enforce_capacity)
            .await
            .inspect_err(|e| {
                if e.is(ErrorKind::InvalidState) {
                    warn!(
                        user_id = %user_id,
                        server_id = %server_id,
                        max = server.max_connections,
                        "Connect rejected: server at capacity"
                    );
                }
            })?;

        if let Some(old) = &superseded {
            info!(
                user_id = %user_id,
                connection_id = %old.id,
                server_id = %old.server_id,
                duration = old.duration,
                "Connection superseded"
            );
        }
        info!(
            user_id = %user_id,
            connection_id = %connection.id,
            server_id = %server_id,
            "Connected"
        );

        Ok(ConnectOutcome {
            connection,
            server_name: server.name,
            superseded,
        })
    }

    /// Close the user's active connection.
    ///
    /// Fails with InvalidState when the user is Idle.
    pub async fn disconnect(&self, ctx: &RequestContext) -> AppResult<Connection> {
        let lock = self.user_lock(&ctx.user_id);
        let result = {
            let _guard = lock.lock().await;
            self.connections.close_active(&ctx.user_id, Utc::now()).await
        };
        drop(lock);
        self.release_lock(&ctx.user_id);

        let closed = result?.ok_or_else(|| AppError::invalid_state("No active connection found"))?;
        info!(
            user_id = %ctx.user_id,
            connection_id = %closed.id,
            server_id = %closed.server_id,
            duration = closed.duration,
            "Disconnected"
        );
        Ok(closed)
    }

    /// The user's active connection with its server's name and country.
    pub async fn current(&self, ctx: &RequestContext) -> AppResult<Option<ConnectionView>> {
        self.connections.find_active_view(&ctx.user_id).await
    }

    /// The user's connections, newest first.
    ///
    /// `limit` defaults to, and is capped at, the configured history limit.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        limit: Option<i64>,
    ) -> AppResult<Vec<ConnectionView>> {
        let limit = limit
            .unwrap_or(self.history_limit)
            .clamp(0, self.history_limit);
        self.connections.history(&ctx.user_id, limit).await
    }
}
