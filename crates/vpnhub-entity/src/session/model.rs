//! Session entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vpnhub_core::types::UserId;

/// An authentication session.
///
/// Maps an opaque bearer token to a user until `expires_at`. A user holds at
/// most one live session; issuing a new one replaces all earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Opaque bearer credential.
    pub session_token: String,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// When the session was issued.
    pub created_at: DateTime<Utc>,
    /// When the session stops resolving.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session issued at `now` that lives for `ttl`.
    pub fn new(
        session_token: impl Into<String>,
        user_id: UserId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            session_token: session_token.into(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the session has expired as of `now`.
    ///
    /// A session is live strictly before `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let session = Session::new("tok", UserId::new("u1"), now, Duration::days(7));
        assert!(!session.is_expired_at(now));
        assert!(!session.is_expired_at(now + Duration::days(7) - Duration::seconds(1)));
        assert!(session.is_expired_at(now + Duration::days(7)));
    }
}
