//! Server counter reconciliation against the connection ledger.
//!
//! Detects and corrects drift left by legacy data or crashes.

use std::sync::Arc;

use tracing::{info, warn};

use vpnhub_core::result::AppResult;
use vpnhub_database::{ConnectionStore, CounterDrift};

/// Recomputes every server's `current_connections` from active connections.
#[derive(Debug, Clone)]
pub struct CounterReconciler {
    connections: Arc<dyn ConnectionStore>,
}

impl CounterReconciler {
    /// Creates a new counter reconciler.
    pub fn new(connections: Arc<dyn ConnectionStore>) -> Self {
        Self { connections }
    }

    /// Performs a reconciliation cycle. Returns the corrected servers.
    pub async fn reconcile(&self) -> AppResult<Vec<CounterDrift>> {
        let drifts = self.connections.reconcile_counters().await?;
        for drift in &drifts {
            warn!(
                server_id = %drift.server_id,
                server_name = %drift.server_name,
                recorded = drift.recorded,
                actual = drift.actual,
                delta = drift.recorded - drift.actual,
                "Server counter drift corrected"
            );
        }
        Ok(drifts)
    }

    /// Reconcile once during startup.
    pub async fn startup_recovery(&self) -> AppResult<()> {
        info!("Running startup counter reconciliation");

        let drifts = self.reconcile().await?;
        if drifts.is_empty() {
            info!("Server counters are consistent");
        } else {
            info!(corrected = drifts.len(), "Startup reconciliation corrected counters");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vpnhub_core::types::UserId;
    use vpnhub_database::ServerStore;
    use vpnhub_database::memory::MemoryStore;
    use vpnhub_entity::connection::Connection;
    use vpnhub_entity::server::{NewServer, ServerStatus};

    #[tokio::test]
    async fn test_reconcile_restores_counts_from_active_rows() {
        let store = MemoryStore::new();
        let server = NewServer {
            name: "UK (London)".to_string(),
            country: "United Kingdom".to_string(),
            city: "London".to_string(),
            ip_address: "198.51.100.30".to_string(),
            status: Some(ServerStatus::Online),
            max_connections: Some(800),
        }
        .into_server(Utc::now());
        ServerStore::create(&store, &server).await.unwrap();

        for user in ["a", "b"] {
            store
                .open(&Connection::open(UserId::new(user), server.id.clone(), Utc::now()), false)
                .await
                .unwrap();
        }
        store.adjust_connection_count(&server.id, 478).await.unwrap();

        let reconciler = CounterReconciler::new(Arc::new(store.clone()));
        let drifts = reconciler.reconcile().await.unwrap();
        assert_eq!(drifts.len(), 1);
        assert_eq!(drifts[0].recorded, 480);
        assert_eq!(drifts[0].actual, 2);

        let fixed = ServerStore::find_by_id(&store, &server.id).await.unwrap().unwrap();
        assert_eq!(fixed.current_connections, 2);
        assert!(reconciler.reconcile().await.unwrap().is_empty());
    }
}
