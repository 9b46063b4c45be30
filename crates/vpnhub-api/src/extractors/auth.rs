//! `AuthUser` extractor: resolves the session token and loads the user.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use vpnhub_core::error::AppError;
use vpnhub_entity::user::User;
use vpnhub_service::context::RequestContext;

use crate::state::AppState;

/// The authenticated caller, available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The stored user record.
    pub user: User,
    /// Context passed to services.
    pub context: RequestContext,
}

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// Bearer credential from the session cookie, else the `Authorization` header.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(cookie_name).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers, &state.config.auth.cookie_name)
            .ok_or_else(|| AppError::authentication("Not authenticated"))?;

        let user = state.session_manager.authenticate(&token).await?;
        let context = RequestContext::from_user(&user);

        Ok(AuthUser { user, context })
    }
}
