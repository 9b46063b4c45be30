//! Admin server catalog handlers.

use axum::Json;
use axum::extract::{Path, State};

use vpnhub_core::error::AppError;
use vpnhub_core::types::ServerId;
use vpnhub_entity::server::{Server, ServerPatch};

use crate::dto::request::{CreateServerRequest, UpdateServerRequest};
use crate::dto::response::{CreateServerResponse, MessageResponse, ReconcileResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/servers
pub async fn list_servers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Server>>, AppError> {
    require_admin(&state, &auth)?;
    Ok(Json(state.server_registry.list().await?))
}

/// POST /api/admin/servers
pub async fn create_server(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateServerRequest>,
) -> Result<Json<CreateServerResponse>, AppError> {
    require_admin(&state, &auth)?;
    let server = state
        .server_registry
        .create(auth.context(), req.into())
        .await?;
    Ok(Json(CreateServerResponse {
        message: "Server created successfully".to_string(),
        server_id: server.id,
    }))
}

/// PUT /api/admin/servers/{id}
pub async fn update_server(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ServerId>,
    ValidatedJson(req): ValidatedJson<UpdateServerRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state, &auth)?;
    let patch: ServerPatch = req.into();
    state
        .server_registry
        .update(auth.context(), &id, &patch)
        .await?;
    Ok(Json(MessageResponse::new("Server updated successfully")))
}

/// DELETE /api/admin/servers/{id}
pub async fn delete_server(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ServerId>,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state, &auth)?;
    state.server_registry.delete(auth.context(), &id).await?;
    Ok(Json(MessageResponse::new("Server deleted successfully")))
}

/// POST /api/admin/servers/reconcile
pub async fn reconcile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ReconcileResponse>, AppError> {
    require_admin(&state, &auth)?;
    let drifts = state.reconciler.reconcile().await?;
    Ok(Json(ReconcileResponse {
        corrected: drifts.len(),
        drifts,
    }))
}
