//! Identity provider trait and profile payload.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vpnhub_core::result::AppResult;
use vpnhub_core::types::UserId;
use vpnhub_entity::user::NewUser;

/// Profile returned by the identity provider for a valid session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    /// Provider-assigned user identity.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
    /// Bearer token to issue as the local session.
    pub session_token: String,
}

impl IdentityProfile {
    /// The user fields of the profile.
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            picture: self.picture.clone(),
        }
    }
}

/// Resolves an opaque provider session id into a profile.
///
/// Implementations make exactly one attempt and fail with an
/// `ExternalService` error on any upstream problem.
#[async_trait]
pub trait IdentityProvider: Send + Sync + Debug + 'static {
    /// Exchange `session_id` for the profile it belongs to.
    async fn exchange(&self, session_id: &str) -> AppResult<IdentityProfile>;
}
