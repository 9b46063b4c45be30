//! Auth handlers: profile exchange, me, logout.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use vpnhub_auth::identity::http::SESSION_ID_HEADER;
use vpnhub_core::error::AppError;
use vpnhub_entity::user::User;

use crate::dto::response::{AuthResponse, MessageResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/profile
///
/// Exchanges the identity provider's session id for a local session and
/// sets the session cookie.
pub async fn profile(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let session_id = headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("Missing {SESSION_ID_HEADER} header")))?;

    let result = state.session_manager.login(session_id).await?;

    let auth = &state.config.auth;
    let max_age = time::Duration::days(state.config.session.ttl_days);
    let cookie = Cookie::build((auth.cookie_name.clone(), result.session.session_token.clone()))
        .path("/")
        .http_only(true)
        .secure(auth.cookie_secure)
        .same_site(SameSite::None)
        .max_age(max_age);

    Ok((
        jar.add(cookie),
        Json(AuthResponse {
            user: result.user,
            session_token: result.session.session_token,
        }),
    ))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    auth: AuthUser,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    state.session_manager.revoke(&auth.user_id).await?;

    let removal = Cookie::build((state.config.auth.cookie_name.clone(), "")).path("/");

    Ok((
        jar.remove(removal),
        Json(MessageResponse::new("Logged out successfully")),
    ))
}
