//! Convenience result type alias for VPN Hub.

use crate::error::AppError;

/// A specialized `Result` type for VPN Hub operations.
pub type AppResult<T> = Result<T, AppError>;
