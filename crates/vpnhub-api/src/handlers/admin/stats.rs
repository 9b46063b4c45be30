//! Admin dashboard statistics handler.

use axum::Json;
use axum::extract::State;

use vpnhub_core::error::AppError;
use vpnhub_service::AdminStats;

use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AdminStats>, AppError> {
    require_admin(&state, &auth)?;
    Ok(Json(state.stats_service.admin_stats(auth.context()).await?))
}
