//! Session lifecycle manager: provider exchange, resolution and logout.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use vpnhub_core::config::SessionConfig;
use vpnhub_core::error::{AppError, ErrorKind};
use vpnhub_core::result::AppResult;
use vpnhub_core::types::UserId;
use vpnhub_database::{SessionStore, UserStore};
use vpnhub_entity::session::Session;
use vpnhub_entity::user::User;

use crate::identity::IdentityProvider;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// The logged-in user.
    pub user: User,
    /// The session issued for them.
    pub session: Session,
}

/// Manages the complete session lifecycle.
#[derive(Debug, Clone)]
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    identity: Arc<dyn IdentityProvider>,
    ttl: Duration,
}

impl SessionManager {
    /// Creates a session manager.
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        identity: Arc<dyn IdentityProvider>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            identity,
            ttl: Duration::days(config.ttl_days),
        }
    }

    /// Performs the login flow for a provider session id:
    ///
    /// 1. Exchange the id with the identity provider
    /// 2. Create the user, or refresh `last_login` of the existing one
    /// 3. Issue the provider's token as the user's only session
    ///
    /// Any provider failure is reported as an authentication error.
    pub async fn login(&self, session_id: &str) -> AppResult<LoginResult> {
        let profile = self.identity.exchange(session_id).await.map_err(|e| {
            warn!(error = %e, "Identity provider exchange failed");
            if e.is(ErrorKind::ExternalService) {
                AppError::authentication("Invalid session")
            } else {
                e
            }
        })?;

        let now = Utc::now();
        let user = self.users.record_login(profile.to_new_user(), now).await?;
        let session = self.issue(&user.id, &profile.session_token).await?;

        info!(user_id = %user.id, "Login successful");
        Ok(LoginResult { user, session })
    }

    /// Replace every session of `user_id` with one for `token`.
    pub async fn issue(&self, user_id: &UserId, token: &str) -> AppResult<Session> {
        let session = Session::new(token, user_id.clone(), Utc::now(), self.ttl);
        self.sessions.replace_for_user(&session).await?;
        Ok(session)
    }

    /// The user identity behind a live token.
    pub async fn resolve(&self, token: &str) -> AppResult<UserId> {
        let session = self
            .sessions
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid or expired session"))?;

        if session.is_expired_at(Utc::now()) {
            return Err(AppError::authentication("Invalid or expired session"));
        }
        Ok(session.user_id)
    }

    /// The user behind a live token.
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let user_id = self.resolve(token).await?;
        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::authentication("User not found"))
    }

    /// Delete every session of a user.
    pub async fn revoke(&self, user_id: &UserId) -> AppResult<u64> {
        let removed = self.sessions.delete_by_user(user_id).await?;
        info!(user_id = %user_id, removed, "Sessions revoked");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{IdentityProfile, StaticIdentityProvider};
    use vpnhub_database::memory::MemoryStore;

    fn manager(ttl_days: i64) -> (SessionManager, StaticIdentityProvider, MemoryStore) {
        let store = MemoryStore::new();
        let identity = StaticIdentityProvider::new();
        let config = SessionConfig {
            ttl_days,
            ..Default::default()
        };
        let manager = SessionManager::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(identity.clone()),
            &config,
        );
        (manager, identity, store)
    }

    fn profile(token: &str) -> IdentityProfile {
        IdentityProfile {
            id: UserId::new("user-1"),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            picture: None,
            session_token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_provider_token() {
        let (manager, identity, _) = manager(7);
        identity.insert("sid-1", profile("tok-1"));

        let result = manager.login("sid-1").await.unwrap();
        assert_eq!(result.session.session_token, "tok-1");
        assert_eq!(result.session.expires_at - result.session.created_at, Duration::days(7));

        let user = manager.authenticate("tok-1").await.unwrap();
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_unknown_session_id_is_unauthenticated() {
        let (manager, _, _) = manager(7);
        let err = manager.login("nope").await.unwrap_err();
        assert!(err.is(ErrorKind::Authentication));
    }

    #[tokio::test]
    async fn test_new_login_invalidates_previous_token() {
        let (manager, identity, _) = manager(7);
        identity.insert("sid-1", profile("tok-1"));
        identity.insert("sid-2", profile("tok-2"));

        manager.login("sid-1").await.unwrap();
        manager.login("sid-2").await.unwrap();

        assert!(manager.resolve("tok-1").await.unwrap_err().is(ErrorKind::Authentication));
        assert_eq!(manager.resolve("tok-2").await.unwrap(), UserId::new("user-1"));
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let (manager, _, _) = manager(0);
        manager.issue(&UserId::new("user-1"), "tok").await.unwrap();
        assert!(manager.resolve("tok").await.unwrap_err().is(ErrorKind::Authentication));
    }

    #[tokio::test]
    async fn test_revoke_logs_out() {
        let (manager, identity, _) = manager(7);
        identity.insert("sid-1", profile("tok-1"));
        manager.login("sid-1").await.unwrap();

        assert_eq!(manager.revoke(&UserId::new("user-1")).await.unwrap(), 1);
        assert!(manager.authenticate("tok-1").await.is_err());
    }

    #[tokio::test]
    async fn test_session_of_missing_user_is_rejected() {
        let (manager, _, _) = manager(7);
        manager.issue(&UserId::new("ghost"), "tok").await.unwrap();
        let err = manager.authenticate("tok").await.unwrap_err();
        assert!(err.is(ErrorKind::Authentication));
    }
}
