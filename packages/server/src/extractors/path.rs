use axum::{
    extract::{FromRequestParts, Path, rejection::PathRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `Path<T>` that reports unparsable segments (e.g. a non-numeric id) as
/// `VALIDATION_ERROR` instead of axum's plain-text rejection.
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(AppPath(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Rejected path parameters");
                Err(AppError::Validation(format!(
                    "Invalid path parameter: {}",
                    rejection.body_text()
                )))
            }
        }
    }
}
