use thiserror::Error;

use crate::model::ReviewId;
use crate::rating::AggregationError;
use crate::storage::StoreError;

/// Failures of review create/update/delete.
///
/// Input errors are detected before any write. `AggregationFailed` is the only
/// variant that can follow a committed review write.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("authentication required")]
    Unauthenticated,

    #[error("rating must be a number between 0 and 5")]
    InvalidRating,

    #[error("movie '{0}' not found")]
    MovieNotFound(String),

    #[error("you have already reviewed this movie")]
    DuplicateReview,

    #[error("review {0} not found")]
    ReviewNotFound(ReviewId),

    /// The actor is authenticated but does not own the review.
    #[error("you are not authorized to modify this review")]
    NotAuthorized,

    #[error(transparent)]
    AggregationFailed(#[from] AggregationError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ReviewError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ReviewError::DuplicateReview,
            other => ReviewError::Store(other),
        }
    }
}
