//! Connection handlers: disconnect, current, history.

use axum::Json;
use axum::extract::State;

use vpnhub_core::error::AppError;

use crate::dto::request::HistoryQuery;
use crate::dto::response::{ConnectionsResponse, CurrentConnectionResponse, MessageResponse};
use crate::extractors::{AuthUser, ValidatedQuery};
use crate::state::AppState;

/// POST /api/connections/disconnect
pub async fn disconnect(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    state.ledger.disconnect(auth.context()).await?;
    Ok(Json(MessageResponse::new("Disconnected successfully")))
}

/// GET /api/connections/history
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<HistoryQuery>,
) -> Result<Json<ConnectionsResponse>, AppError> {
    let connections = state.ledger.history(auth.context(), query.limit).await?;
    Ok(Json(ConnectionsResponse { connections }))
}

/// GET /api/connections/current
pub async fn current(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CurrentConnectionResponse>, AppError> {
    let connection = state.ledger.current(auth.context()).await?;
    Ok(Json(CurrentConnectionResponse { connection }))
}
