//! Server registry: catalog reads for users, CRUD for admins.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use vpnhub_auth::RbacEnforcer;
use vpnhub_core::error::AppError;
use vpnhub_core::result::AppResult;
use vpnhub_core::types::ServerId;
use vpnhub_database::ServerStore;
use vpnhub_entity::server::{NewServer, Server, ServerPatch};

use crate::context::RequestContext;

use super::seed::SAMPLE_SERVERS;

/// Holds server records. Counters are moved only by the connection ledger.
#[derive(Debug, Clone)]
pub struct ServerRegistry {
    servers: Arc<dyn ServerStore>,
    rbac: RbacEnforcer,
}

impl ServerRegistry {
    /// Creates a new server registry.
    pub fn new(servers: Arc<dyn ServerStore>, rbac: RbacEnforcer) -> Self {
        Self { servers, rbac }
    }

    /// All servers, unfiltered.
    pub async fn list(&self) -> AppResult<Vec<Server>> {
        self.servers.find_all().await
    }

    /// Distinct countries across all servers.
    pub async fn list_countries(&self) -> AppResult<Vec<String>> {
        self.servers.countries().await
    }

    /// Create a server (admin). Returns the stored record.
    pub async fn create(&self, ctx: &RequestContext, new_server: NewServer) -> AppResult<Server> {
        self.rbac.require_admin_role(&ctx.user_id, ctx.role)?;

        let server = new_server.into_server(Utc::now());
        self.servers.create(&server).await?;

        info!(
            admin_id = %ctx.user_id,
            server_id = %server.id,
            name = %server.name,
            status = %server.status,
            "Server created"
        );
        Ok(server)
    }

    /// Merge `patch` into a server (admin).
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &ServerId,
        patch: &ServerPatch,
    ) -> AppResult<Server> {
        self.rbac.require_admin_role(&ctx.user_id, ctx.role)?;

        let server = self
            .servers
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Server not found"))?;

        info!(admin_id = %ctx.user_id, server_id = %id, "Server updated");
        Ok(server)
    }

    /// Remove a server (admin). Its connection history is kept.
    pub async fn delete(&self, ctx: &RequestContext, id: &ServerId) -> AppResult<()> {
        self.rbac.require_admin_role(&ctx.user_id, ctx.role)?;

        if !self.servers.delete(id).await? {
            return Err(AppError::not_found("Server not found"));
        }

        info!(admin_id = %ctx.user_id, server_id = %id, "Server deleted");
        Ok(())
    }

    /// Install the sample catalog if the registry is empty.
    ///
    /// Returns the number of servers created. Counters start at zero.
    pub async fn seed_samples(&self) -> AppResult<usize> {
        if self.servers.count().await? > 0 {
            return Ok(0);
        }

        let now = Utc::now();
        for (i, sample) in SAMPLE_SERVERS.iter().enumerate() {
            // Distinct timestamps keep catalog order stable.
            let created_at = now + Duration::milliseconds(i as i64);
            let mut server = NewServer {
                name: sample.name.to_string(),
                country: sample.country.to_string(),
                city: sample.city.to_string(),
                ip_address: sample.ip_address.to_string(),
                status: Some(sample.status),
                max_connections: Some(sample.max_connections),
            }
            .into_server(created_at);
            server.load = sample.load;
            self.servers.create(&server).await?;
        }

        info!(count = SAMPLE_SERVERS.len(), "Sample servers seeded");
        Ok(SAMPLE_SERVERS.len())
    }
}
