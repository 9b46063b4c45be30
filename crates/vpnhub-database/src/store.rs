//! Store bundle selected from configuration.

use std::sync::Arc;

use tracing::info;

use vpnhub_core::config::{DatabaseConfig, DatabaseProvider};
use vpnhub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    ConnectionRepository, ServerRepository, SessionRepository, UserRepository,
};
use crate::traits::{ConnectionStore, ServerStore, SessionStore, UserStore};

#[derive(Debug, Clone)]
enum Backend {
    Postgres(DatabasePool),
    Memory,
}

/// Handles to the four collections on one backend.
///
/// Acquired once at process start and shared by every service.
#[derive(Debug, Clone)]
pub struct Store {
    /// User records.
    pub users: Arc<dyn UserStore>,
    /// Server catalog.
    pub servers: Arc<dyn ServerStore>,
    /// Authentication sessions.
    pub sessions: Arc<dyn SessionStore>,
    /// Connection ledger.
    pub connections: Arc<dyn ConnectionStore>,
    backend: Backend,
}

impl Store {
    /// Open the backend named by `config.provider`.
    ///
    /// For PostgreSQL this connects the pool and, when
    /// `config.run_migrations` is set, applies pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            DatabaseProvider::Memory => {
                info!("Using in-memory store; data is lost on exit");
                Ok(Self::memory())
            }
        }
    }

    /// Build a store over an open PostgreSQL pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            servers: Arc::new(ServerRepository::new(pg.clone())),
            sessions: Arc::new(SessionRepository::new(pg.clone())),
            connections: Arc::new(ConnectionRepository::new(pg)),
            backend: Backend::Postgres(pool),
        }
    }

    /// Build an empty in-memory store.
    pub fn memory() -> Self {
        let memory = MemoryStore::new();
        Self {
            users: Arc::new(memory.clone()),
            servers: Arc::new(memory.clone()),
            sessions: Arc::new(memory.clone()),
            connections: Arc::new(memory),
            backend: Backend::Memory,
        }
    }

    /// Which backend this store runs on.
    pub fn provider(&self) -> DatabaseProvider {
        match self.backend {
            Backend::Postgres(_) => DatabaseProvider::Postgres,
            Backend::Memory => DatabaseProvider::Memory,
        }
    }

    /// The PostgreSQL pool, if this store has one.
    pub fn pool(&self) -> Option<&DatabasePool> {
        match &self.backend {
            Backend::Postgres(pool) => Some(pool),
            Backend::Memory => None,
        }
    }

    /// Check that the backend is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.backend {
            Backend::Postgres(pool) => pool.health_check().await,
            Backend::Memory => Ok(true),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Backend::Postgres(pool) = &self.backend {
            pool.close().await;
        }
    }
}
