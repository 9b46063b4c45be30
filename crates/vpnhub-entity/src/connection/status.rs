//! Connection status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a connection record.
///
/// A record moves from `Active` to `Disconnected` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "connection_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// The user's current connection.
    Active,
    /// Closed, explicitly or by supersession.
    Disconnected,
}

impl ConnectionStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
