//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use vpnhub_api::{AppState, build_app};
use vpnhub_auth::{IdentityProfile, StaticIdentityProvider};
use vpnhub_core::config::{AppConfig, DatabaseProvider};
use vpnhub_core::types::{ServerId, UserId};
use vpnhub_database::Store;
use vpnhub_entity::server::{NewServer, ServerStatus};
use vpnhub_entity::user::UserRole;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct store access
    pub state: AppState,
    /// Identity provider answering the profile exchange
    pub identity: StaticIdentityProvider,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(mut config: AppConfig) -> Self {
        config.database.provider = DatabaseProvider::Memory;

        let identity = StaticIdentityProvider::new();
        let state = AppState::new(config, Store::memory(), Arc::new(identity.clone()));
        let router = build_app(state.clone());

        Self {
            router,
            state,
            identity,
        }
    }

    /// Register a provider profile and log in through `/api/auth/profile`.
    ///
    /// Returns the issued session token.
    pub async fn login(&self, user_id: &str, email: &str) -> String {
        let session_id = format!("sid-{user_id}-{}", uuid_like());
        let token = format!("tok-{user_id}-{}", uuid_like());
        self.identity.insert(
            session_id.clone(),
            IdentityProfile {
                id: UserId::new(user_id),
                email: email.to_string(),
                name: user_id.to_string(),
                picture: None,
                session_token: token.clone(),
            },
        );

        let response = self.exchange(&session_id).await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response
            .body
            .get("session_token")
            .and_then(|v| v.as_str())
            .expect("No session_token in login response")
            .to_string()
    }

    /// Log in and promote the user to admin.
    pub async fn login_admin(&self, user_id: &str, email: &str) -> String {
        let token = self.login(user_id, email).await;
        let updated = self
            .state
            .store
            .users
            .update_role(&UserId::new(user_id), UserRole::Admin)
            .await
            .expect("update role");
        assert!(updated);
        token
    }

    /// POST /api/auth/profile with the given provider session id
    pub async fn exchange(&self, session_id: &str) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri("/api/auth/profile")
            .header("X-Session-ID", session_id)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Insert a server straight into the store
    pub async fn add_server(&self, name: &str, country: &str, status: ServerStatus) -> ServerId {
        self.add_server_with_capacity(name, country, status, None).await
    }

    /// Insert a server with a capacity ceiling
    pub async fn add_server_with_capacity(
        &self,
        name: &str,
        country: &str,
        status: ServerStatus,
        max_connections: Option<i32>,
    ) -> ServerId {
        let server = NewServer {
            name: name.to_string(),
            country: country.to_string(),
            city: format!("{name} City"),
            ip_address: "10.0.0.1".to_string(),
            status: Some(status),
            max_connections,
        }
        .into_server(Utc::now());
        let id = server.id.clone();
        self.state
            .store
            .servers
            .create(&server)
            .await
            .expect("create server");
        id
    }

    /// Current counter of a server
    pub async fn current_connections(&self, id: &ServerId) -> i32 {
        self.state
            .store
            .servers
            .find_by_id(id)
            .await
            .expect("find server")
            .expect("server exists")
            .current_connections
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Short unique suffix for ids and tokens
fn uuid_like() -> String {
    ServerId::generate().into_inner()
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body
    pub fn error_code(&self) -> &str {
        self.body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}
