//! Route definitions for the VPN Hub HTTP API.
//!
//! All routes except the root banner are mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with every route, without middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(server_routes())
        .merge(connection_routes())
        .merge(admin_routes());

    Router::new()
        .route("/", get(handlers::health::root))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Health checks (no auth)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Identity exchange, me, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/profile", post(handlers::auth::profile))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// Server catalog and connect
fn server_routes() -> Router<AppState> {
    Router::new()
        .route("/servers", get(handlers::servers::list_servers))
        .route("/servers/countries", get(handlers::servers::list_countries))
        .route("/servers/{id}/connect", post(handlers::servers::connect))
}

/// The caller's connections
fn connection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/connections/disconnect",
            post(handlers::connections::disconnect),
        )
        .route("/connections/history", get(handlers::connections::history))
        .route("/connections/current", get(handlers::connections::current))
}

/// Admin endpoints (require admin role)
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(handlers::admin::users::list_users))
        .route(
            "/admin/users/{id}/role",
            put(handlers::admin::users::update_role),
        )
        .route(
            "/admin/servers",
            get(handlers::admin::servers::list_servers).post(handlers::admin::servers::create_server),
        )
        .route(
            "/admin/servers/reconcile",
            post(handlers::admin::servers::reconcile),
        )
        .route(
            "/admin/servers/{id}",
            put(handlers::admin::servers::update_server)
                .delete(handlers::admin::servers::delete_server),
        )
        .route("/admin/stats", get(handlers::admin::stats::stats))
}
