//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, State};

use vpnhub_core::error::AppError;
use vpnhub_core::types::UserId;

use crate::dto::request::UpdateRoleRequest;
use crate::dto::response::{MessageResponse, UsersResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UsersResponse>, AppError> {
    require_admin(&state, &auth)?;
    let users = state.admin_user_service.list_users(auth.context()).await?;
    Ok(Json(UsersResponse { users }))
}

/// PUT /api/admin/users/{id}/role
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state, &auth)?;
    state
        .admin_user_service
        .set_role(auth.context(), &id, &req.role)
        .await?;
    Ok(Json(MessageResponse::new("User role updated successfully")))
}
