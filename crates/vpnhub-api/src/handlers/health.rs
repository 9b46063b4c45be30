//! Root banner and health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{DetailedHealthResponse, HealthResponse, RootResponse};
use crate::state::AppState;

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "VPN Service Management API".to_string(),
        status: "running".to_string(),
    })
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let store = match state.store.health_check().await {
        Ok(true) => "connected",
        Ok(false) => "unavailable",
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            "unavailable"
        }
    };

    Json(DetailedHealthResponse {
        status: if store == "connected" { "ok" } else { "degraded" }.to_string(),
        store_provider: state.store.provider().to_string(),
        store: store.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
