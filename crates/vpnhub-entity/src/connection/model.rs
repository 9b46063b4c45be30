//! Connection entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vpnhub_core::types::{ConnectionId, ServerId, UserId};

use super::status::ConnectionStatus;

/// Label shown for a connection whose server has been deleted.
pub const UNKNOWN_SERVER: &str = "Unknown";

/// A single connect/disconnect episode of a user on a server.
///
/// Records are append-only history and are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Connection {
    /// Unique connection identifier.
    pub id: ConnectionId,
    /// The connecting user.
    pub user_id: UserId,
    /// The server connected to. May no longer exist.
    pub server_id: ServerId,
    /// When the connection was opened.
    pub connected_at: DateTime<Utc>,
    /// When the connection was closed.
    pub disconnected_at: Option<DateTime<Utc>>,
    /// Whole seconds between open and close, set on close.
    pub duration: Option<i64>,
    /// Bytes transferred. Reserved; the simulator never fills it.
    pub data_transferred: Option<i64>,
    /// Lifecycle state.
    pub status: ConnectionStatus,
}

impl Connection {
    /// Open a new active connection at `now`.
    pub fn open(user_id: UserId, server_id: ServerId, now: DateTime<Utc>) -> Self {
        Self {
            id: ConnectionId::generate(),
            user_id,
            server_id,
            connected_at: now,
            disconnected_at: None,
            duration: None,
            data_transferred: None,
            status: ConnectionStatus::Active,
        }
    }

    /// Whether this is a user's current connection.
    pub fn is_active(&self) -> bool {
        self.status == ConnectionStatus::Active
    }

    /// Mark the connection closed at `now`.
    ///
    /// Returns `false` without touching anything if it was already closed.
    pub fn close(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = ConnectionStatus::Disconnected;
        self.disconnected_at = Some(now);
        self.duration = Some(duration_seconds(self.connected_at, now));
        true
    }
}

/// A connection annotated with its server's name and country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ConnectionView {
    /// The connection record.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub connection: Connection,
    /// Server name, or [`UNKNOWN_SERVER`].
    pub server_name: String,
    /// Server country, or [`UNKNOWN_SERVER`].
    pub server_country: String,
}

impl ConnectionView {
    /// Annotate a connection with an optional server's name and country.
    pub fn new(connection: Connection, server: Option<(&str, &str)>) -> Self {
        let (name, country) = server.unwrap_or((UNKNOWN_SERVER, UNKNOWN_SERVER));
        Self {
            connection,
            server_name: name.to_string(),
            server_country: country.to_string(),
        }
    }
}

/// Whole seconds elapsed between two instants, truncated toward zero.
pub fn duration_seconds(connected_at: DateTime<Utc>, disconnected_at: DateTime<Utc>) -> i64 {
    (disconnected_at - connected_at).num_seconds()
}
