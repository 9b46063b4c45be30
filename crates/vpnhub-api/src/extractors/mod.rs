//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod query;

pub use auth::{AuthUser, extract_token};
pub use json::ValidatedJson;
pub use query::ValidatedQuery;
