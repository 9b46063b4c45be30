//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vpnhub_core::types::UserId;

use super::role::UserRole;

/// A user known to VPN Hub.
///
/// Users are created on their first successful identity-provider exchange
/// and are never hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identity assigned by the identity provider.
    pub id: UserId,
    /// Email address (unique).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub picture: Option<String>,
    /// Role (RBAC).
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Profile data returned by the identity provider, used to create a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Identity assigned by the identity provider.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub picture: Option<String>,
}

impl NewUser {
    /// Build the stored record for a first login at `now`.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            picture: self.picture,
            role: UserRole::User,
            created_at: now,
            last_login: Some(now),
        }
    }
}
