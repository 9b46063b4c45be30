//! Admin user management: listing and role changes.

use std::sync::Arc;

use tracing::info;

use vpnhub_auth::RbacEnforcer;
use vpnhub_core::error::AppError;
use vpnhub_core::result::AppResult;
use vpnhub_core::types::UserId;
use vpnhub_database::UserStore;
use vpnhub_entity::user::{User, UserRole};

use crate::context::RequestContext;

/// Handles administrative user management operations.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    users: Arc<dyn UserStore>,
    rbac: RbacEnforcer,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(users: Arc<dyn UserStore>, rbac: RbacEnforcer) -> Self {
        Self { users, rbac }
    }

    /// Lists all users.
    pub async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        self.rbac.require_admin_role(&ctx.user_id, ctx.role)?;
        self.users.find_all().await
    }

    /// Sets a user's role from its wire name (`"user"` or `"admin"`).
    ///
    /// An unknown role fails with InvalidState before anything is written.
    pub async fn set_role(
        &self,
        ctx: &RequestContext,
        user_id: &UserId,
        role: &str,
    ) -> AppResult<UserRole> {
        self.rbac.require_admin_role(&ctx.user_id, ctx.role)?;

        let role: UserRole = role.parse()?;
        if !self.users.update_role(user_id, role).await? {
            return Err(AppError::not_found("User not found"));
        }

        info!(
            admin_id = %ctx.user_id,
            user_id = %user_id,
            role = %role,
            "User role updated"
        );
        Ok(role)
    }
}
