//! Axum extractor for validated JSON bodies
//!
//! `ValidatedJson<T>` decodes the body as `T`, runs its `Validate`
//! implementation and rejects with [`OrderError`] so every decoding or
//! validation failure surfaces as a `400` with the common error body.

use crate::core::error::{OrderError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that decodes and validates a JSON payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_order(
///     State(state): State<AppState>,
///     ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
/// ) -> Result<impl IntoResponse, OrderError> {
///     // request is already decoded and validated
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = OrderError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        payload.validate()?;

        Ok(ValidatedJson(payload))
    }
}

/// Axum reports missing fields as 422; here every body problem is a 400.
fn rejection_to_error(rejection: JsonRejection) -> OrderError {
    OrderError::Validation(ValidationError::InvalidJson {
        message: rejection.body_text(),
    })
}
