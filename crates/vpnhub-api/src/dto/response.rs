//! Response DTOs.

use serde::{Deserialize, Serialize};

use vpnhub_core::types::{ConnectionId, ServerId};
use vpnhub_database::CounterDrift;
use vpnhub_entity::connection::ConnectionView;
use vpnhub_entity::user::User;

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Build from any string-like value.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Service banner returned at `/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    /// Service name.
    pub message: String,
    /// Always `running`.
    pub status: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status (`ok` or `degraded`).
    pub status: String,
    /// Store backend.
    pub store_provider: String,
    /// Store status.
    pub store: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The logged-in user.
    pub user: User,
    /// Issued session token.
    pub session_token: String,
}

/// Distinct countries of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesResponse {
    /// Country names.
    pub countries: Vec<String>,
}

/// Connect response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectResponse {
    /// `Connected to {server}`.
    pub message: String,
    /// New connection identity.
    pub connection_id: ConnectionId,
}

/// Connection history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionsResponse {
    /// Newest first.
    pub connections: Vec<ConnectionView>,
}

/// The caller's active connection, `null` when idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConnectionResponse {
    /// Active connection.
    pub connection: Option<ConnectionView>,
}

/// User listing (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    /// All users.
    pub users: Vec<User>,
}

/// Server creation response (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServerResponse {
    /// Confirmation.
    pub message: String,
    /// New server identity.
    pub server_id: ServerId,
}

/// Counter reconciliation result (admin).
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResponse {
    /// Number of counters corrected.
    pub corrected: usize,
    /// Per-server corrections.
    pub drifts: Vec<CounterDrift>,
}
