use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `Json<T>` that reports unreadable bodies as `VALIDATION_ERROR` instead of
/// axum's plain-text rejection.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Rejected request body");
                Err(AppError::Validation(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                )))
            }
        }
    }
}
