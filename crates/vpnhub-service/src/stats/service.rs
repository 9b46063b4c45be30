//! Aggregate counts for the admin dashboard.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use vpnhub_auth::RbacEnforcer;
use vpnhub_core::result::AppResult;
use vpnhub_database::{ConnectionStore, ServerStore, UserStore};
use vpnhub_entity::server::ServerStatus;

use crate::context::RequestContext;

/// Window for `recent_connections`.
const RECENT_WINDOW_DAYS: i64 = 7;

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    /// Registered users.
    pub total_users: i64,
    /// Servers in the catalog.
    pub total_servers: i64,
    /// Servers with status online.
    pub online_servers: i64,
    /// Active connections.
    pub active_connections: i64,
    /// Connections opened in the last seven days.
    pub recent_connections: i64,
}

/// Computes [`AdminStats`].
#[derive(Debug, Clone)]
pub struct StatsService {
    users: Arc<dyn UserStore>,
    servers: Arc<dyn ServerStore>,
    connections: Arc<dyn ConnectionStore>,
    rbac: RbacEnforcer,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(
        users: Arc<dyn UserStore>,
        servers: Arc<dyn ServerStore>,
        connections: Arc<dyn ConnectionStore>,
        rbac: RbacEnforcer,
    ) -> Self {
        Self {
            users,
            servers,
            connections,
            rbac,
        }
    }

    /// Current dashboard counters (admin).
    pub async fn admin_stats(&self, ctx: &RequestContext) -> AppResult<AdminStats> {
        self.rbac.require_admin_role(&ctx.user_id, ctx.role)?;

        let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        Ok(AdminStats {
            total_users: self.users.count().await?,
            total_servers: self.servers.count().await?,
            online_servers: self.servers.count_by_status(ServerStatus::Online).await?,
            active_connections: self.connections.count_active().await?,
            recent_connections: self.connections.count_since(since).await?,
        })
    }
}
