use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use filmtweet_common::ReviewError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "Rating must be a number between 0 and 5")]
    pub error: String,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `MOVIE_NOT_FOUND`,
    /// `TOKEN_MISSING`, `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`,
    /// `NOT_FOUND`, `CONFLICT`, `USERNAME_TAKEN`, `EMAIL_TAKEN`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// The referenced movie does not exist. Reported as bad input.
    MovieNotFound(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    PermissionDenied(String),
    NotFound(String),
    Conflict(String),
    UsernameTaken,
    EmailTaken,
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code, error) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::MovieNotFound(msg) => (StatusCode::BAD_REQUEST, "MOVIE_NOT_FOUND", msg),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_MISSING",
                "Authentication required".into(),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_INVALID",
                "Invalid or expired token".into(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".into(),
            ),
            AppError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, "PERMISSION_DENIED", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                "USERNAME_TAKEN",
                "Username is already taken".into(),
            ),
            AppError::EmailTaken => (
                StatusCode::CONFLICT,
                "EMAIL_TAKEN",
                "Email is already registered".into(),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                )
            }
        };
        (status, ErrorBody { error, code })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::MissingField(field) => {
                AppError::Validation(format!("Movie {field} is required"))
            }
            ReviewError::InvalidRating => {
                AppError::Validation("Rating must be a number between 0 and 5".into())
            }
            ReviewError::MovieNotFound(_) => AppError::MovieNotFound("Movie not found".into()),
            ReviewError::Unauthenticated => AppError::TokenMissing,
            ReviewError::NotAuthorized => AppError::PermissionDenied(
                "You are not authorized to modify this review".into(),
            ),
            ReviewError::ReviewNotFound(_) => AppError::NotFound("Review not found".into()),
            ReviewError::DuplicateReview => {
                AppError::Conflict("You have already reviewed this movie".into())
            }
            err @ (ReviewError::AggregationFailed(_) | ReviewError::Store(_)) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}
