//! Fixed identity provider for local development and tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use vpnhub_core::error::AppError;
use vpnhub_core::result::AppResult;

use super::provider::{IdentityProfile, IdentityProvider};

/// Answers from a fixed table of session id to profile.
///
/// Unknown session ids fail the way a non-200 upstream response would.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    profiles: Arc<RwLock<HashMap<String, IdentityProfile>>>,
}

impl StaticIdentityProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the profile returned for `session_id`.
    pub fn insert(&self, session_id: impl Into<String>, profile: IdentityProfile) {
        if let Ok(mut profiles) = self.profiles.write() {
            profiles.insert(session_id.into(), profile);
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn exchange(&self, session_id: &str) -> AppResult<IdentityProfile> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| AppError::internal("Identity table lock poisoned"))?;
        profiles
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::external_service("Identity provider returned status 401"))
    }
}
