//! Connection ledger configuration.

use serde::{Deserialize, Serialize};

/// Connection ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Maximum number of records returned by the history endpoint.
    #[serde(default = "default_history_limit")]
    pub history_limit: i64,
    /// Reject a connect when the server is at `max_connections`.
    #[serde(default)]
    pub enforce_capacity: bool,
    /// Interval of the counter reconciliation in minutes (`0` = startup only).
    #[serde(default)]
    pub reconcile_interval_minutes: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            enforce_capacity: false,
            reconcile_interval_minutes: 0,
        }
    }
}

fn default_history_limit() -> i64 {
    50
}
