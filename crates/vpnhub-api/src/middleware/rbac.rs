//! RBAC helper for admin-only routes.

use vpnhub_core::error::AppError;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(state: &AppState, auth: &AuthUser) -> Result<(), AppError> {
    state.rbac_enforcer.require_admin(&auth.user)
}
