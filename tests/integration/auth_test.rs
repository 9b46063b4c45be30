//! Integration tests for the identity exchange and session handling.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};

#[tokio::test]
async fn test_root_and_health() {
    let app = helpers::TestApp::new();

    let root = app.request("GET", "/", None, None).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["message"], "VPN Service Management API");
    assert_eq!(root.body["status"], "running");

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");

    let detailed = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(detailed.status, StatusCode::OK);
    assert_eq!(detailed.body["store"], "connected");
    assert_eq!(detailed.body["store_provider"], "memory");
}

#[tokio::test]
async fn test_profile_sets_cookie_and_returns_token() {
    let app = helpers::TestApp::new();
    let token = app.login("user-1", "one@example.com").await;
    assert!(token.starts_with("tok-user-1"));

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"], "user-1");
    assert_eq!(me.body["email"], "one@example.com");
    assert_eq!(me.body["role"], "user");
}

#[tokio::test]
async fn test_profile_cookie_attributes() {
    let app = helpers::TestApp::new();
    app.identity.insert(
        "sid-cookie",
        vpnhub_auth::IdentityProfile {
            id: vpnhub_core::types::UserId::new("cookie-user"),
            email: "cookie@example.com".to_string(),
            name: "Cookie".to_string(),
            picture: Some("https://example.com/a.png".to_string()),
            session_token: "cookie-token".to_string(),
        },
    );

    let response = app.exchange("sid-cookie").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["session_token"], "cookie-token");
    assert_eq!(response.body["user"]["picture"], "https://example.com/a.png");

    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("Set-Cookie header");
    assert!(cookie.starts_with("session_token=cookie-token"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=None"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=604800"));
}

#[tokio::test]
async fn test_profile_without_header_is_rejected() {
    let app = helpers::TestApp::new();
    let response = app.request("POST", "/api/auth/profile", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_provider_session_is_unauthenticated() {
    let app = helpers::TestApp::new();
    let response = app.exchange("never-issued").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_missing_and_invalid_tokens() {
    let app = helpers::TestApp::new();

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let invalid = app
        .request("GET", "/api/auth/me", None, Some("not-a-token"))
        .await;
    assert_eq!(invalid.status, StatusCode::UNAUTHORIZED);
    assert_eq!(invalid.error_code(), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_cookie_takes_precedence_over_header() {
    let app = helpers::TestApp::new();
    let token = app.login("user-2", "two@example.com").await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("session_token={token}"))
        .header(header::AUTHORIZATION, "Bearer bogus")
        .body(Body::empty())
        .expect("request");
    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], "user-2");

    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::COOKIE, "session_token=bogus")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request");
    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_new_login_invalidates_previous_token() {
    let app = helpers::TestApp::new();
    let first = app.login("user-3", "three@example.com").await;
    let second = app.login("user-3", "three@example.com").await;
    assert_ne!(first, second);

    let old = app.request("GET", "/api/auth/me", None, Some(&first)).await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);

    let new = app.request("GET", "/api/auth/me", None, Some(&second)).await;
    assert_eq!(new.status, StatusCode::OK);

    let users = app.state.store.users.count().await.expect("count");
    assert_eq!(users, 1);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = helpers::TestApp::new();
    let token = app.login("user-4", "four@example.com").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Logged out successfully");
    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("removal cookie");
    assert!(cookie.starts_with("session_token="));

    let after = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_regular_user_cannot_reach_admin_routes() {
    let app = helpers::TestApp::new();
    let token = app.login("user-5", "five@example.com").await;

    for path in ["/api/admin/users", "/api/admin/servers", "/api/admin/stats"] {
        let response = app.request("GET", path, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(response.error_code(), "PERMISSION_DENIED");
    }
}
