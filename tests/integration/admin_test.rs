//! Integration tests for admin server, user and stats endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use vpnhub_core::types::{ServerId, UserId};
use vpnhub_entity::server::ServerStatus;
use vpnhub_entity::user::UserRole;

#[tokio::test]
async fn test_create_server_with_defaults() {
    let app = helpers::TestApp::new();
    let admin = app.login_admin("root", "root@example.com").await;

    let created = app
        .request(
            "POST",
            "/api/admin/servers",
            Some(json!({
                "name": "Paris",
                "country": "France",
                "city": "Paris",
                "ip_address": "51.15.0.1",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["message"], "Server created successfully");
    let id = created.body["server_id"].as_str().expect("server_id").to_string();

    let server = app
        .state
        .store
        .servers
        .find_by_id(&ServerId::new(id))
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(server.status, ServerStatus::Offline);
    assert_eq!(server.load, 0);
    assert_eq!(server.current_connections, 0);
    assert_eq!(server.max_connections, 1000);
}

#[tokio::test]
async fn test_create_server_rejects_bad_payloads() {
    let app = helpers::TestApp::new();
    let admin = app.login_admin("root", "root@example.com").await;

    let unknown_key = app
        .request(
            "POST",
            "/api/admin/servers",
            Some(json!({
                "name": "X",
                "country": "US",
                "city": "NYC",
                "ip_address": "10.0.0.2",
                "current_connections": 99,
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(unknown_key.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_key.error_code(), "VALIDATION_ERROR");

    let bad_ip = app
        .request(
            "POST",
            "/api/admin/servers",
            Some(json!({
                "name": "X",
                "country": "US",
                "city": "NYC",
                "ip_address": "999.1.1.1",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(bad_ip.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.state.store.servers.count().await.expect("count"), 0);
}

#[tokio::test]
async fn test_update_and_delete_server() {
    let app = helpers::TestApp::new();
    let admin = app.login_admin("root", "root@example.com").await;
    let id = app.add_server("Old", "US", ServerStatus::Offline).await;

    let updated = app
        .request(
            "PUT",
            &format!("/api/admin/servers/{id}"),
            Some(json!({ "name": "New", "status": "online", "load": 42 })),
            Some(&admin),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["message"], "Server updated successfully");

    let server = app
        .state
        .store
        .servers
        .find_by_id(&id)
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(server.name, "New");
    assert_eq!(server.status, ServerStatus::Online);
    assert_eq!(server.load, 42);
    assert_eq!(server.country, "US");

    let out_of_range = app
        .request(
            "PUT",
            &format!("/api/admin/servers/{id}"),
            Some(json!({ "load": 150 })),
            Some(&admin),
        )
        .await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);

    let deleted = app
        .request("DELETE", &format!("/api/admin/servers/{id}"), None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Server deleted successfully");

    let again = app
        .request("DELETE", &format!("/api/admin/servers/{id}"), None, Some(&admin))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let missing = app
        .request(
            "PUT",
            &format!("/api/admin/servers/{id}"),
            Some(json!({ "name": "Ghost" })),
            Some(&admin),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_update() {
    let app = helpers::TestApp::new();
    let admin = app.login_admin("root", "root@example.com").await;
    let token = app.login("member", "member@example.com").await;

    let invalid = app
        .request(
            "PUT",
            "/api/admin/users/member/role",
            Some(json!({ "role": "superuser" })),
            Some(&admin),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.error_code(), "INVALID_STATE");
    let user = app
        .state
        .store
        .users
        .find_by_id(&UserId::new("member"))
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(user.role, UserRole::User);

    let missing = app
        .request(
            "PUT",
            "/api/admin/users/nobody/role",
            Some(json!({ "role": "admin" })),
            Some(&admin),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let promoted = app
        .request(
            "PUT",
            "/api/admin/users/member/role",
            Some(json!({ "role": "admin" })),
            Some(&admin),
        )
        .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.body["message"], "User role updated successfully");

    let users = app.request("GET", "/api/admin/users", None, Some(&token)).await;
    assert_eq!(users.status, StatusCode::OK);
    assert_eq!(users.body["users"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_admin_stats() {
    let app = helpers::TestApp::new();
    let admin = app.login_admin("root", "root@example.com").await;
    let token = app.login("member", "member@example.com").await;
    let online = app.add_server("On", "US", ServerStatus::Online).await;
    app.add_server("Off", "US", ServerStatus::Offline).await;

    app.request("POST", &format!("/api/servers/{online}/connect"), None, Some(&token))
        .await;

    let stats = app.request("GET", "/api/admin/stats", None, Some(&admin)).await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["total_users"], 2);
    assert_eq!(stats.body["total_servers"], 2);
    assert_eq!(stats.body["online_servers"], 1);
    assert_eq!(stats.body["active_connections"], 1);
    assert_eq!(stats.body["recent_connections"], 1);
}

#[tokio::test]
async fn test_reconcile_repairs_counter_drift() {
    let app = helpers::TestApp::new();
    let admin = app.login_admin("root", "root@example.com").await;
    let token = app.login("member", "member@example.com").await;
    let s = app.add_server("S", "US", ServerStatus::Online).await;

    app.request("POST", &format!("/api/servers/{s}/connect"), None, Some(&token))
        .await;
    app.state
        .store
        .servers
        .adjust_connection_count(&s, 4)
        .await
        .expect("adjust");
    assert_eq!(app.current_connections(&s).await, 5);

    let response = app
        .request("POST", "/api/admin/servers/reconcile", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["corrected"], 1);
    assert_eq!(response.body["drifts"][0]["recorded"], 5);
    assert_eq!(response.body["drifts"][0]["actual"], 1);
    assert_eq!(app.current_connections(&s).await, 1);

    let clean = app
        .request("POST", "/api/admin/servers/reconcile", None, Some(&admin))
        .await;
    assert_eq!(clean.body["corrected"], 0);
}

#[tokio::test]
async fn test_seeded_catalog() {
    let app = helpers::TestApp::new();
    let token = app.login("member", "member@example.com").await;

    let created = app.state.server_registry.seed_samples().await.expect("seed");
    assert_eq!(created, 6);
    assert_eq!(app.state.server_registry.seed_samples().await.expect("seed"), 0);

    let servers = app.request("GET", "/api/servers", None, Some(&token)).await;
    let servers = servers.body.as_array().expect("array");
    assert_eq!(servers.len(), 6);
    assert!(servers.iter().all(|s| s["current_connections"] == 0));
    let maintenance = servers
        .iter()
        .filter(|s| s["status"] == "maintenance")
        .count();
    assert_eq!(maintenance, 1);
}
