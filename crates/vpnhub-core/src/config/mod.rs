//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section has defaults so that an empty source yields
//! a runnable configuration.

pub mod app;
pub mod auth;
pub mod connection;
pub mod database;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::connection::ConnectionConfig;
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Overlay used when `VPNHUB_ENV` is unset. It has no file, so the base
/// configuration applies unchanged.
pub const DEFAULT_ENV: &str = "production";

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + environment overlay + `VPNHUB__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistent store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Identity provider and cookie settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session store settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Connection ledger settings.
    #[serde(default)]
    pub connections: ConnectionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `path` (usually `config/default.toml`) with an optional
    /// `config/{env}.toml` overlay and environment variables prefixed with
    /// `VPNHUB__` (e.g. `VPNHUB__DATABASE__URL`).
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("VPNHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Settings that are unsafe outside local development.
    pub fn unsafe_settings(&self) -> Vec<&'static str> {
        let mut found = Vec::new();
        if self.database.provider == DatabaseProvider::Memory {
            found.push("in-memory store: all data is lost on restart");
        }
        if !self.auth.cookie_secure {
            found.push("session cookie is sent without the Secure flag");
        }
        found
    }
}
