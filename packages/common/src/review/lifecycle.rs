use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::error::ReviewError;
use super::input::{RawRating, ReviewDraft, ReviewPatch};
use crate::model::{Identity, NewReview, Review, ReviewChanges, ReviewFilter, ReviewId};
use crate::rating::{AggregateRating, RatingAggregator};
use crate::storage::{MovieStore, ReviewStore, StoreError};

/// Outcome of [`ReviewService::create`].
#[derive(Debug, Clone)]
pub struct CreatedReview {
    pub review: Review,
    pub movie_rating: AggregateRating,
}

/// Outcome of [`ReviewService::update`].
#[derive(Debug, Clone)]
pub struct UpdatedReview {
    pub review: Review,
    pub movie_rating: AggregateRating,
}

/// Outcome of [`ReviewService::delete`].
#[derive(Debug, Clone)]
pub struct DeletedReview {
    pub id: ReviewId,
    pub title: String,
    /// Rating of the movie after removal. Zero when no reviews remain.
    pub movie_rating: AggregateRating,
}

/// Outcome of [`ReviewService::recalculate_all`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecalculationSummary {
    /// New rating per recomputed movie title.
    pub ratings: BTreeMap<String, AggregateRating>,
}

impl RecalculationSummary {
    pub fn recomputed(&self) -> usize {
        self.ratings.len()
    }
}

/// Creates, edits and deletes reviews while keeping movie ratings in step.
///
/// Every successful mutation is followed by a synchronous recompute of the
/// affected movie. If that recompute fails the mutation stays committed and
/// the call returns [`ReviewError::AggregationFailed`].
#[derive(Clone)]
pub struct ReviewService {
    movies: Arc<dyn MovieStore>,
    reviews: Arc<dyn ReviewStore>,
    aggregator: RatingAggregator,
}

impl ReviewService {
    pub fn new(movies: Arc<dyn MovieStore>, reviews: Arc<dyn ReviewStore>) -> Self {
        let aggregator = RatingAggregator::new(movies.clone(), reviews.clone());
        Self {
            movies,
            reviews,
            aggregator,
        }
    }

    pub fn aggregator(&self) -> &RatingAggregator {
        &self.aggregator
    }

    /// Reviews matching `filter`, newest first.
    pub async fn list(&self, filter: &ReviewFilter) -> Result<Vec<Review>, ReviewError> {
        Ok(self.reviews.find(filter).await?)
    }

    pub async fn get(&self, id: ReviewId) -> Result<Review, ReviewError> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or(ReviewError::ReviewNotFound(id))
    }

    /// Publish a new review for `identity`.
    ///
    /// Checks run in a fixed order and the first failure wins: title, identity,
    /// rating, movie existence, then uniqueness.
    #[instrument(skip(self, identity, draft))]
    pub async fn create(
        &self,
        identity: Option<&Identity>,
        draft: ReviewDraft,
    ) -> Result<CreatedReview, ReviewError> {
        // Matched verbatim: a padded title is a different, unknown movie.
        let title = draft
            .title
            .filter(|t| !t.is_empty())
            .ok_or(ReviewError::MissingField("title"))?;
        let identity = identity.ok_or(ReviewError::Unauthenticated)?;
        let rating = draft
            .rating
            .as_ref()
            .ok_or(ReviewError::InvalidRating)?
            .validate()?;

        if self.movies.find_by_title(&title).await?.is_none() {
            return Err(ReviewError::MovieNotFound(title));
        }

        let existing = self
            .reviews
            .find(&ReviewFilter::by_author_and_title(&identity.username, &title))
            .await?;
        if !existing.is_empty() {
            return Err(ReviewError::DuplicateReview);
        }

        let review = self
            .reviews
            .insert(NewReview {
                username: identity.username.clone(),
                title: title.clone(),
                review: draft.comment.unwrap_or_default(),
                rating,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => {
                    debug!("Duplicate review race: unique constraint caught on insert");
                    ReviewError::DuplicateReview
                }
                other => ReviewError::Store(other),
            })?;

        info!(
            review_id = review.id,
            username = %review.username,
            title = %review.title,
            rating = review.rating,
            "Review created"
        );

        let movie_rating = self.recompute_after_write(&title).await?;
        Ok(CreatedReview {
            review,
            movie_rating,
        })
    }

    /// Edit the comment and/or rating of a review owned by `identity`.
    #[instrument(skip(self, identity, patch))]
    pub async fn update(
        &self,
        identity: Option<&Identity>,
        id: ReviewId,
        patch: ReviewPatch,
    ) -> Result<UpdatedReview, ReviewError> {
        let identity = identity.ok_or(ReviewError::Unauthenticated)?;
        let existing = self.find_owned(identity, id).await?;
        let rating = patch.rating.as_ref().map(RawRating::validate).transpose()?;

        let changes = ReviewChanges {
            review: patch.comment,
            rating,
        };
        let review = if changes.is_empty() {
            existing
        } else {
            self.reviews
                .update_by_id(id, changes)
                .await?
                .ok_or(ReviewError::ReviewNotFound(id))?
        };

        info!(review_id = id, title = %review.title, "Review updated");

        let movie_rating = self.recompute_after_write(&review.title).await?;
        Ok(UpdatedReview {
            review,
            movie_rating,
        })
    }

    /// Remove a review owned by `identity`.
    #[instrument(skip(self, identity))]
    pub async fn delete(
        &self,
        identity: Option<&Identity>,
        id: ReviewId,
    ) -> Result<DeletedReview, ReviewError> {
        let identity = identity.ok_or(ReviewError::Unauthenticated)?;
        let existing = self.find_owned(identity, id).await?;
        let title = existing.title;

        if !self.reviews.delete_by_id(id).await? {
            // Lost a race with another delete of the same review.
            return Err(ReviewError::ReviewNotFound(id));
        }

        info!(review_id = id, title = %title, "Review deleted");

        let movie_rating = self.recompute_after_write(&title).await?;
        Ok(DeletedReview {
            id,
            title,
            movie_rating,
        })
    }

    /// Recompute the rating of every movie that has at least one review.
    ///
    /// Movies are processed one at a time and independently; a failure stops
    /// the run but keeps the ratings already written.
    #[instrument(skip(self))]
    pub async fn recalculate_all(&self) -> Result<RecalculationSummary, ReviewError> {
        let titles = self.reviews.distinct_titles().await?;
        let mut summary = RecalculationSummary::default();

        for title in titles {
            let rating = self.aggregator.recompute(&title).await?;
            summary.ratings.insert(title, rating);
        }

        info!(movies = summary.recomputed(), "Recalculated movie ratings");
        Ok(summary)
    }

    /// Existence is checked before ownership.
    async fn find_owned(&self, identity: &Identity, id: ReviewId) -> Result<Review, ReviewError> {
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or(ReviewError::ReviewNotFound(id))?;

        if !review.is_owned_by(identity) {
            return Err(ReviewError::NotAuthorized);
        }
        Ok(review)
    }

    async fn recompute_after_write(&self, title: &str) -> Result<AggregateRating, ReviewError> {
        self.aggregator.recompute(title).await.map_err(|e| {
            warn!(error = %e, "Review write committed but rating recompute failed");
            ReviewError::from(e)
        })
    }
}
