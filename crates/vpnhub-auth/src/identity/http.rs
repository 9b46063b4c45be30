//! HTTP identity provider client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use vpnhub_core::config::AuthConfig;
use vpnhub_core::error::{AppError, ErrorKind};
use vpnhub_core::result::AppResult;

use super::provider::{IdentityProfile, IdentityProvider};

/// Header carrying the provider session id.
pub const SESSION_ID_HEADER: &str = "X-Session-ID";

/// Calls the provider's session-data endpoint with `X-Session-ID`.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpIdentityProvider {
    /// Build a client bounded by `config.request_timeout_seconds`.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build identity provider client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            url: config.identity_provider_url.clone(),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn exchange(&self, session_id: &str) -> AppResult<IdentityProfile> {
        let response = self
            .client
            .get(&self.url)
            .header(SESSION_ID_HEADER, session_id)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "Identity provider timed out"
                } else {
                    "Identity provider unreachable"
                };
                AppError::with_source(ErrorKind::ExternalService, reason, e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::external_service(format!(
                "Identity provider returned status {status}"
            )));
        }

        let profile: IdentityProfile = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Identity provider returned an unreadable profile",
                e,
            )
        })?;

        debug!(user_id = %profile.id, "Identity provider exchange succeeded");
        Ok(profile)
    }
}
