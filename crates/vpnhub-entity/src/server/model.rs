//! Server entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vpnhub_core::types::ServerId;

use super::status::ServerStatus;

/// Capacity ceiling applied when a create request does not name one.
pub const DEFAULT_MAX_CONNECTIONS: i32 = 1000;

/// A VPN server in the catalog.
///
/// `load` and `current_connections` are simulated counters, not telemetry.
/// `current_connections` is only written by the connection ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Server {
    /// Unique server identifier.
    pub id: ServerId,
    /// Display name, e.g. "UK (London)".
    pub name: String,
    /// Country used for grouping in the catalog.
    pub country: String,
    /// City.
    pub city: String,
    /// Public network address.
    pub ip_address: String,
    /// Administrative status.
    pub status: ServerStatus,
    /// Informational load percentage (0-100).
    pub load: i32,
    /// Advisory capacity ceiling.
    pub max_connections: i32,
    /// Number of active connections bound to this server.
    pub current_connections: i32,
    /// When the server was created.
    pub created_at: DateTime<Utc>,
}

impl Server {
    /// Whether the live counter has reached the capacity ceiling.
    pub fn is_at_capacity(&self) -> bool {
        self.current_connections >= self.max_connections
    }
}

/// Fields an admin supplies when creating a server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewServer {
    /// Display name.
    pub name: String,
    /// Country.
    pub country: String,
    /// City.
    pub city: String,
    /// Public network address.
    pub ip_address: String,
    /// Initial status; defaults to offline.
    pub status: Option<ServerStatus>,
    /// Capacity ceiling; defaults to [`DEFAULT_MAX_CONNECTIONS`].
    pub max_connections: Option<i32>,
}

impl NewServer {
    /// Build the stored record with a fresh identity and zeroed counters.
    pub fn into_server(self, now: DateTime<Utc>) -> Server {
        Server {
            id: ServerId::generate(),
            name: self.name,
            country: self.country,
            city: self.city,
            ip_address: self.ip_address,
            status: self.status.unwrap_or_default(),
            load: 0,
            max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
            current_connections: 0,
            created_at: now,
        }
    }
}

/// Partial update of a server; `None` fields are left untouched.
///
/// `current_connections` is deliberately absent: only the ledger moves it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerPatch {
    /// New display name.
    pub name: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New network address.
    pub ip_address: Option<String>,
    /// New status.
    pub status: Option<ServerStatus>,
    /// New load percentage.
    pub load: Option<i32>,
    /// New capacity ceiling.
    pub max_connections: Option<i32>,
}

impl ServerPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the patch into `server`.
    pub fn apply_to(&self, server: &mut Server) {
        if let Some(name) = &self.name {
            server.name = name.clone();
        }
        if let Some(country) = &self.country {
            server.country = country.clone();
        }
        if let Some(city) = &self.city {
            server.city = city.clone();
        }
        if let Some(ip_address) = &self.ip_address {
            server.ip_address = ip_address.clone();
        }
        if let Some(status) = self.status {
            server.status = status;
        }
        if let Some(load) = self.load {
            server.load = load;
        }
        if let Some(max_connections) = self.max_connections {
            server.max_connections = max_connections;
        }
    }
}
