//! Server catalog handlers for regular users.

use axum::Json;
use axum::extract::{Path, State};

use vpnhub_core::error::AppError;
use vpnhub_core::types::ServerId;
use vpnhub_entity::server::Server;

use crate::dto::response::{ConnectResponse, CountriesResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/servers
pub async fn list_servers(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Server>>, AppError> {
    Ok(Json(state.server_registry.list().await?))
}

/// GET /api/servers/countries
pub async fn list_countries(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<CountriesResponse>, AppError> {
    let countries = state.server_registry.list_countries().await?;
    Ok(Json(CountriesResponse { countries }))
}

/// POST /api/servers/{id}/connect
pub async fn connect(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ServerId>,
) -> Result<Json<ConnectResponse>, AppError> {
    let outcome = state.ledger.connect(auth.context(), &id).await?;

    Ok(Json(ConnectResponse {
        message: format!("Connected to {}", outcome.server_name),
        connection_id: outcome.connection.id,
    }))
}
