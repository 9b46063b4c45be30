//! Server status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative status of a server record.
///
/// Only `Online` servers accept new connections.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "server_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// Accepting connections.
    Online,
    /// Not accepting connections.
    #[default]
    Offline,
    /// Temporarily withdrawn by an admin.
    Maintenance,
}

impl ServerStatus {
    /// Whether a new connection may be opened on a server in this status.
    pub fn accepts_connections(&self) -> bool {
        matches!(self, Self::Online)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServerStatus {
    type Err = vpnhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(vpnhub_core::AppError::validation(format!(
                "Invalid server status: '{s}'. Expected one of: online, offline, maintenance"
            ))),
        }
    }
}
