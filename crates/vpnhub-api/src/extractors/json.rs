//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;
use validator::Validate;

use vpnhub_core::error::AppError;

/// Deserializes a JSON body and validates it.
///
/// Malformed bodies, unknown fields and failed rules all reject with a
/// validation error.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;

        Ok(ValidatedJson(value))
    }
}
