//! Session store configuration.

use serde::{Deserialize, Serialize};

/// Session store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lifetime of an issued session in days.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,
    /// Interval of the expired-session purge in minutes.
    ///
    /// `0` disables the purge; expired sessions are then only rejected at
    /// resolution time and stay in the store.
    #[serde(default)]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
            cleanup_interval_minutes: 0,
        }
    }
}

fn default_ttl_days() -> i64 {
    7
}
