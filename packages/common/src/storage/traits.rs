use std::collections::BTreeSet;

use async_trait::async_trait;

use super::error::StoreError;
use crate::model::{Movie, NewReview, Review, ReviewChanges, ReviewFilter, ReviewId};
use crate::rating::AggregateRating;

/// Read access to movies, plus the single write path for their derived rating.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Look up a movie by exact title.
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError>;

    /// Overwrite the stored rating of the movie with the given title.
    ///
    /// Returns `false` when no movie matched. Only the rating aggregator can
    /// produce an [`AggregateRating`], which keeps it the sole writer.
    async fn update_rating(&self, title: &str, rating: AggregateRating)
    -> Result<bool, StoreError>;
}

/// Review persistence.
///
/// Implementations must enforce uniqueness of (`username`, `title`) on insert
/// and report violations as [`StoreError::Duplicate`].
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Reviews matching the filter, newest first.
    async fn find(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError>;

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, StoreError>;

    async fn insert(&self, review: NewReview) -> Result<Review, StoreError>;

    /// Apply a partial update. Returns `None` when the review no longer exists.
    async fn update_by_id(
        &self,
        id: ReviewId,
        changes: ReviewChanges,
    ) -> Result<Option<Review>, StoreError>;

    /// Returns `true` if a review was removed.
    async fn delete_by_id(&self, id: ReviewId) -> Result<bool, StoreError>;

    /// Every movie title referenced by at least one review.
    async fn distinct_titles(&self) -> Result<BTreeSet<String>, StoreError>;
}
