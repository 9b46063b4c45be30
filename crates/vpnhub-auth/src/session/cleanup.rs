//! Expired session purge.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use vpnhub_core::result::AppResult;
use vpnhub_database::SessionStore;

/// Deletes sessions past their expiry.
///
/// Expired sessions never resolve, so this only reclaims storage.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    sessions: Arc<dyn SessionStore>,
}

impl SessionCleanup {
    /// Creates a new session cleanup handler.
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Runs a cleanup cycle. Returns the number of sessions deleted.
    pub async fn run_cleanup(&self) -> AppResult<u64> {
        let removed = self.sessions.delete_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "Expired sessions purged");
        }
        Ok(removed)
    }
}
