//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vpnhub_core::types::UserId;
use vpnhub_entity::user::{User, UserRole};

/// Context for the current authenticated request.
///
/// Built by the API layer once the session token resolves, and passed into
/// service methods so every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's role when the request was resolved.
    pub role: UserRole,
    /// The user's email (for log fields).
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a resolved user.
    pub fn new(user_id: UserId, role: UserRole, email: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            email: email.into(),
            request_time: Utc::now(),
        }
    }

    /// Creates a context from a stored user record.
    pub fn from_user(user: &User) -> Self {
        Self::new(user.id.clone(), user.role, user.email.clone())
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
