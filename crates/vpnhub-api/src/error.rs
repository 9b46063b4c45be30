//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl for `AppError` lives in `vpnhub_core::error`
//! (orphan rule); it is re-exported here along with its helpers.

pub use vpnhub_core::error::{ApiErrorResponse, status_for};
