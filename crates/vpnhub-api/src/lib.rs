//! # vpnhub-api
//!
//! HTTP API layer for VPN Hub built on Axum.
//!
//! Provides the REST endpoints, middleware (RBAC, CORS, logging),
//! extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
