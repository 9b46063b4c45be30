//! RBAC enforcement for admin-only operations.

use tracing::warn;

use vpnhub_core::error::AppError;
use vpnhub_core::types::UserId;
use vpnhub_entity::user::{User, UserRole};

/// Gates operations by role.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Fails with an authorization error unless `user` is an admin.
    pub fn require_admin(&self, user: &User) -> Result<(), AppError> {
        self.require_admin_role(&user.id, user.role)
    }

    /// Fails with an authorization error unless `role` is admin.
    pub fn require_admin_role(&self, user_id: &UserId, role: UserRole) -> Result<(), AppError> {
        if role.is_admin() {
            Ok(())
        } else {
            warn!(user_id = %user_id, role = %role, "Admin access denied");
            Err(AppError::authorization("Admin access required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vpnhub_core::error::ErrorKind;
    use vpnhub_core::types::UserId;
    use vpnhub_entity::user::NewUser;

    #[test]
    fn test_require_admin() {
        let mut user = NewUser {
            id: UserId::new("u1"),
            email: "u1@example.com".to_string(),
            name: "U1".to_string(),
            picture: None,
        }
        .into_user(Utc::now());

        let enforcer = RbacEnforcer::new();
        let err = enforcer.require_admin(&user).unwrap_err();
        assert!(err.is(ErrorKind::Authorization));

        user.role = UserRole::Admin;
        assert!(enforcer.require_admin(&user).is_ok());
    }
}
