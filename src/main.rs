//! VPN Hub server: simulated VPN service management API.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, fmt};

use vpnhub_api::AppState;
use vpnhub_auth::{HttpIdentityProvider, IdentityProvider};
use vpnhub_core::config::{AppConfig, DEFAULT_ENV};
use vpnhub_core::error::AppError;
use vpnhub_database::Store;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay and `VPNHUB__*` variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("VPNHUB_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("VPNHUB_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting VPN Hub v{}", env!("CARGO_PKG_VERSION"));
    for setting in config.unsafe_settings() {
        tracing::warn!("Unsafe for production: {}", setting);
    }

    // ── Step 1: Store (+ migrations) ─────────────────────────────
    tracing::info!(provider = %config.database.provider, "Opening store...");
    let store = Store::connect(&config.database).await?;

    // ── Step 2: Identity provider ────────────────────────────────
    let identity: Arc<dyn IdentityProvider> = Arc::new(HttpIdentityProvider::new(&config.auth)?);

    // ── Step 3: Services ─────────────────────────────────────────
    let state = AppState::new(config.clone(), store.clone(), identity);

    // ── Step 4: Sample catalog ───────────────────────────────────
    if config.server.seed_sample_servers {
        state.server_registry.seed_samples().await?;
    }

    // ── Step 5: Counter recovery ─────────────────────────────────
    state.reconciler.startup_recovery().await?;

    // ── Step 6: Background tasks ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut background: Vec<JoinHandle<()>> = Vec::new();

    if config.session.cleanup_interval_minutes > 0 {
        background.push(spawn_session_cleanup(
            &state,
            Duration::from_secs(config.session.cleanup_interval_minutes * 60),
            shutdown_rx.clone(),
        ));
    }
    if config.connections.reconcile_interval_minutes > 0 {
        background.push(spawn_reconcile(
            &state,
            Duration::from_secs(config.connections.reconcile_interval_minutes * 60),
            shutdown_rx.clone(),
        ));
    }

    // ── Step 7: Build and start HTTP server ──────────────────────
    let app = vpnhub_api::build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("VPN Hub server listening on {}", addr);

    // ── Step 8: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 9: Wait for background tasks, close store ───────────
    tracing::info!("Waiting for background tasks to complete...");
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    for handle in background {
        let _ = tokio::time::timeout(grace, handle).await;
    }

    store.close().await;

    tracing::info!("VPN Hub server shut down gracefully");
    Ok(())
}

/// Periodically purge expired sessions until shutdown.
fn spawn_session_cleanup(
    state: &AppState,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let cleanup = Arc::clone(&state.session_cleanup);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = cleanup.run_cleanup().await {
                        tracing::error!(error = %e, "Session cleanup failed");
                    }
                }
                _ = shutdown.changed() => break,
            }
        }
    })
}

/// Periodically reconcile server counters until shutdown.
fn spawn_reconcile(
    state: &AppState,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let reconciler = Arc::clone(&state.reconciler);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // Startup recovery already covered the first tick.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = reconciler.reconcile().await {
                        tracing::error!(error = %e, "Counter reconciliation failed");
                    }
                }
                _ = shutdown.changed() => break,
            }
        }
    })
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
