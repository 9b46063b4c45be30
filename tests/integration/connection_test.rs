//! Integration tests for connect, disconnect, current and history.

mod helpers;

use axum::http::StatusCode;
use chrono::{DateTime, FixedOffset};

use vpnhub_core::config::AppConfig;
use vpnhub_entity::server::ServerStatus;

fn connected_at(record: &serde_json::Value) -> DateTime<FixedOffset> {
    let raw = record["connected_at"].as_str().expect("connected_at");
    DateTime::parse_from_rfc3339(raw).expect("rfc3339")
}

#[tokio::test]
async fn test_connect_supersede_disconnect_scenario() {
    let app = helpers::TestApp::new();
    let token = app.login("alice", "alice@example.com").await;
    let s = app
        .add_server_with_capacity("S", "US", ServerStatus::Online, Some(2))
        .await;
    let t = app.add_server("T", "DE", ServerStatus::Online).await;

    let first = app
        .request("POST", &format!("/api/servers/{s}/connect"), None, Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["message"], "Connected to S");
    assert!(first.body["connection_id"].is_string());
    assert_eq!(app.current_connections(&s).await, 1);

    let second = app
        .request("POST", &format!("/api/servers/{t}/connect"), None, Some(&token))
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(app.current_connections(&s).await, 0);
    assert_eq!(app.current_connections(&t).await, 1);

    let current = app
        .request("GET", "/api/connections/current", None, Some(&token))
        .await;
    assert_eq!(current.status, StatusCode::OK);
    assert_eq!(current.body["connection"]["server_id"], t.as_str());
    assert_eq!(current.body["connection"]["server_name"], "T");
    assert_eq!(current.body["connection"]["server_country"], "DE");
    assert_eq!(current.body["connection"]["status"], "active");

    let history = app
        .request("GET", "/api/connections/history", None, Some(&token))
        .await;
    let records = history.body["connections"].as_array().expect("array");
    assert_eq!(records.len(), 2);
    let superseded = records
        .iter()
        .find(|r| r["server_id"] == s.as_str())
        .expect("superseded record");
    assert_eq!(superseded["status"], "disconnected");
    assert!(superseded["duration"].is_i64());
    assert!(superseded["disconnected_at"].is_string());

    let bye = app
        .request("POST", "/api/connections/disconnect", None, Some(&token))
        .await;
    assert_eq!(bye.status, StatusCode::OK);
    assert_eq!(bye.body["message"], "Disconnected successfully");
    assert_eq!(app.current_connections(&t).await, 0);

    let idle = app
        .request("GET", "/api/connections/current", None, Some(&token))
        .await;
    assert!(idle.body["connection"].is_null());
}

#[tokio::test]
async fn test_disconnect_when_idle_is_invalid_state() {
    let app = helpers::TestApp::new();
    let token = app.login("bob", "bob@example.com").await;

    let response = app
        .request("POST", "/api/connections/disconnect", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_STATE");
    assert_eq!(response.body["message"], "No active connection found");
}

#[tokio::test]
async fn test_connect_to_unavailable_server_creates_nothing() {
    let app = helpers::TestApp::new();
    let token = app.login("carol", "carol@example.com").await;
    let offline = app.add_server("Off", "FR", ServerStatus::Offline).await;
    let maintenance = app.add_server("Maint", "JP", ServerStatus::Maintenance).await;

    for id in [&offline, &maintenance] {
        let response = app
            .request("POST", &format!("/api/servers/{id}/connect"), None, Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "INVALID_STATE");
        assert_eq!(app.current_connections(id).await, 0);
    }

    let history = app
        .request("GET", "/api/connections/history", None, Some(&token))
        .await;
    assert_eq!(history.body["connections"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_connect_to_unknown_server_is_not_found() {
    let app = helpers::TestApp::new();
    let token = app.login("dave", "dave@example.com").await;

    let response = app
        .request("POST", "/api/servers/no-such-server/connect", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_connect_requires_authentication() {
    let app = helpers::TestApp::new();
    let s = app.add_server("S", "US", ServerStatus::Online).await;

    let response = app
        .request("POST", &format!("/api/servers/{s}/connect"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.current_connections(&s).await, 0);
}

#[tokio::test]
async fn test_history_limit_and_order() {
    let app = helpers::TestApp::new();
    let token = app.login("erin", "erin@example.com").await;
    let a = app.add_server("A", "US", ServerStatus::Online).await;
    let b = app.add_server("B", "GB", ServerStatus::Online).await;

    for id in [&a, &b, &a] {
        let response = app
            .request("POST", &format!("/api/servers/{id}/connect"), None, Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let full = app
        .request("GET", "/api/connections/history", None, Some(&token))
        .await;
    let records = full.body["connections"].as_array().expect("array");
    assert_eq!(records.len(), 3);
    for pair in records.windows(2) {
        assert!(connected_at(&pair[0]) >= connected_at(&pair[1]));
    }
    let active = records.iter().filter(|r| r["status"] == "active").count();
    assert_eq!(active, 1);

    let limited = app
        .request("GET", "/api/connections/history?limit=2", None, Some(&token))
        .await;
    assert_eq!(limited.status, StatusCode::OK);
    assert_eq!(limited.body["connections"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_history_rejects_malformed_limit() {
    let app = helpers::TestApp::new();
    let token = app.login("frank", "frank@example.com").await;

    let response = app
        .request("GET", "/api/connections/history?limit=abc", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
    assert!(response.body["message"].is_string());
}

#[tokio::test]
async fn test_history_is_per_user() {
    let app = helpers::TestApp::new();
    let alice = app.login("alice", "alice@example.com").await;
    let bob = app.login("bob", "bob@example.com").await;
    let s = app.add_server("S", "US", ServerStatus::Online).await;

    app.request("POST", &format!("/api/servers/{s}/connect"), None, Some(&alice))
        .await;
    app.request("POST", &format!("/api/servers/{s}/connect"), None, Some(&bob))
        .await;
    assert_eq!(app.current_connections(&s).await, 2);

    let history = app
        .request("GET", "/api/connections/history", None, Some(&bob))
        .await;
    let records = history.body["connections"].as_array().expect("array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["user_id"], "bob");
}

#[tokio::test]
async fn test_deleted_server_shows_unknown_in_history() {
    let app = helpers::TestApp::new();
    let admin = app.login_admin("root", "root@example.com").await;
    let token = app.login("frank", "frank@example.com").await;
    let s = app.add_server("Gone", "NL", ServerStatus::Online).await;

    app.request("POST", &format!("/api/servers/{s}/connect"), None, Some(&token))
        .await;
    app.request("POST", "/api/connections/disconnect", None, Some(&token))
        .await;

    let deleted = app
        .request("DELETE", &format!("/api/admin/servers/{s}"), None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let history = app
        .request("GET", "/api/connections/history", None, Some(&token))
        .await;
    let records = history.body["connections"].as_array().expect("array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["server_name"], "Unknown");
    assert_eq!(records[0]["server_country"], "Unknown");
}

#[tokio::test]
async fn test_capacity_is_advisory_by_default() {
    let app = helpers::TestApp::new();
    let s = app
        .add_server_with_capacity("Tiny", "US", ServerStatus::Online, Some(1))
        .await;

    for (user, email) in [("u1", "u1@example.com"), ("u2", "u2@example.com")] {
        let token = app.login(user, email).await;
        let response = app
            .request("POST", &format!("/api/servers/{s}/connect"), None, Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
    assert_eq!(app.current_connections(&s).await, 2);
}

#[tokio::test]
async fn test_capacity_enforced_when_configured() {
    let mut config = AppConfig::default();
    config.connections.enforce_capacity = true;
    let app = helpers::TestApp::with_config(config);
    let s = app
        .add_server_with_capacity("Tiny", "US", ServerStatus::Online, Some(1))
        .await;

    let first = app.login("u1", "u1@example.com").await;
    let second = app.login("u2", "u2@example.com").await;

    let ok = app
        .request("POST", &format!("/api/servers/{s}/connect"), None, Some(&first))
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    let full = app
        .request("POST", &format!("/api/servers/{s}/connect"), None, Some(&second))
        .await;
    assert_eq!(full.status, StatusCode::BAD_REQUEST);
    assert_eq!(full.error_code(), "INVALID_STATE");
    assert_eq!(app.current_connections(&s).await, 1);
}

#[tokio::test]
async fn test_servers_and_countries_listing() {
    let app = helpers::TestApp::new();
    let token = app.login("gina", "gina@example.com").await;
    app.add_server("A", "US", ServerStatus::Online).await;
    app.add_server("B", "US", ServerStatus::Offline).await;
    app.add_server("C", "JP", ServerStatus::Maintenance).await;

    let servers = app.request("GET", "/api/servers", None, Some(&token)).await;
    assert_eq!(servers.status, StatusCode::OK);
    assert_eq!(servers.body.as_array().map(Vec::len), Some(3));

    let countries = app
        .request("GET", "/api/servers/countries", None, Some(&token))
        .await;
    let mut names: Vec<String> = countries.body["countries"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect();
    names.sort();
    assert_eq!(names, vec!["JP".to_string(), "US".to_string()]);
}
