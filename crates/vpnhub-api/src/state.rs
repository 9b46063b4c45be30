//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use vpnhub_auth::{IdentityProvider, RbacEnforcer, SessionCleanup, SessionManager};
use vpnhub_core::config::AppConfig;
use vpnhub_database::Store;
use vpnhub_service::{
    AdminUserService, ConnectionLedger, CounterReconciler, ServerRegistry, StatsService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Store handles (PostgreSQL or in-memory)
    pub store: Store,

    // ── Auth ─────────────────────────────────────────────────
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// Expired session purge
    pub session_cleanup: Arc<SessionCleanup>,
    /// Role-based access control enforcer
    pub rbac_enforcer: RbacEnforcer,

    // ── Services ─────────────────────────────────────────────
    /// Connection state machine
    pub ledger: Arc<ConnectionLedger>,
    /// Server catalog
    pub server_registry: Arc<ServerRegistry>,
    /// Admin user management
    pub admin_user_service: Arc<AdminUserService>,
    /// Admin dashboard statistics
    pub stats_service: Arc<StatsService>,
    /// Server counter reconciliation
    pub reconciler: Arc<CounterReconciler>,
}

impl AppState {
    /// Wire every service over `store`, authenticating through `identity`.
    pub fn new(config: AppConfig, store: Store, identity: Arc<dyn IdentityProvider>) -> Self {
        let rbac_enforcer = RbacEnforcer::new();

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&store.users),
            Arc::clone(&store.sessions),
            identity,
            &config.session,
        ));
        let session_cleanup = Arc::new(SessionCleanup::new(Arc::clone(&store.sessions)));

        let ledger = Arc::new(ConnectionLedger::new(
            Arc::clone(&store.servers),
            Arc::clone(&store.connections),
            &config.connections,
        ));
        let server_registry = Arc::new(ServerRegistry::new(
            Arc::clone(&store.servers),
            rbac_enforcer,
        ));
        let admin_user_service = Arc::new(AdminUserService::new(
            Arc::clone(&store.users),
            rbac_enforcer,
        ));
        let stats_service = Arc::new(StatsService::new(
            Arc::clone(&store.users),
            Arc::clone(&store.servers),
            Arc::clone(&store.connections),
            rbac_enforcer,
        ));
        let reconciler = Arc::new(CounterReconciler::new(Arc::clone(&store.connections)));

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            store,
            session_manager,
            session_cleanup,
            rbac_enforcer,
            ledger,
            server_registry,
            admin_user_service,
            stats_service,
            reconciler,
        }
    }
}
