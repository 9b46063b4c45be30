//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// External identity provider and session cookie configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session-data endpoint of the identity provider.
    #[serde(default = "default_provider_url")]
    pub identity_provider_url: String,
    /// Timeout for the identity provider call in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the session cookie is marked `Secure`.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            identity_provider_url: default_provider_url(),
            request_timeout_seconds: default_request_timeout(),
            cookie_name: default_cookie_name(),
            cookie_secure: default_true(),
        }
    }
}

fn default_provider_url() -> String {
    "https://demobackend.emergentagent.com/auth/v1/env/oauth/session-data".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_cookie_name() -> String {
    "session_token".to_string()
}

fn default_true() -> bool {
    true
}
