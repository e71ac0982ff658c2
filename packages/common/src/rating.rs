use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::model::ReviewFilter;
use crate::storage::{MovieStore, ReviewStore, StoreError};

/// Lowest rating a review may carry.
pub const MIN_RATING: f64 = 0.0;
/// Highest rating a review may carry.
pub const MAX_RATING: f64 = 5.0;

/// A movie's aggregate rating, as computed from its reviews.
///
/// Values can only be produced inside this crate from a review set, which
/// makes [`RatingAggregator`] the single writer of `Movie.rating`: store
/// implementations accept nothing else.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct AggregateRating(f64);

impl AggregateRating {
    /// Rating of a movie without reviews. Crate-private like every other
    /// constructor, so stores cannot be handed a rating out of thin air.
    pub(crate) const UNRATED: Self = Self(0.0);

    /// Mean of `ratings` rounded to one decimal, or [`Self::UNRATED`] when empty.
    pub(crate) fn from_ratings(ratings: impl IntoIterator<Item = f64>) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0.0_f64, 0_u32), |(sum, count), r| (sum + r, count + 1));
        if count == 0 {
            return Self::UNRATED;
        }
        Self(round_to_tenth(sum / f64::from(count)))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// True for a zero rating, the value an unreviewed movie carries.
    pub fn is_unrated(self) -> bool {
        self == Self::UNRATED
    }
}

/// Round half away from zero at the tenths digit.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Returns true for finite ratings within `[MIN_RATING, MAX_RATING]`.
pub fn is_valid_rating(rating: f64) -> bool {
    rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Recomputing a movie's rating failed at the storage layer.
///
/// When raised after a review mutation, the mutation itself has already been
/// committed.
#[derive(Debug, Error)]
#[error("failed to recompute rating for '{title}': {source}")]
pub struct AggregationError {
    pub title: String,
    #[source]
    pub source: StoreError,
}

/// Recomputes and persists movie ratings from their review sets.
#[derive(Clone)]
pub struct RatingAggregator {
    movies: Arc<dyn MovieStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl RatingAggregator {
    pub fn new(movies: Arc<dyn MovieStore>, reviews: Arc<dyn ReviewStore>) -> Self {
        Self { movies, reviews }
    }

    /// Read every review of `title` and overwrite the movie's rating.
    ///
    /// A title without a matching movie is skipped silently. Last writer wins
    /// when two recomputes of the same movie race.
    #[instrument(skip(self))]
    pub async fn recompute(&self, title: &str) -> Result<AggregateRating, AggregationError> {
        let fail = |source| AggregationError {
            title: title.to_string(),
            source,
        };

        let reviews = self
            .reviews
            .find(&ReviewFilter::by_title(title))
            .await
            .map_err(fail)?;
        let rating = AggregateRating::from_ratings(reviews.iter().map(|r| r.rating));

        let matched = self
            .movies
            .update_rating(title, rating)
            .await
            .map_err(fail)?;
        if matched {
            debug!(rating = rating.value(), reviews = reviews.len(), "Movie rating updated");
        } else {
            debug!("No movie with this title, rating not stored");
        }

        Ok(rating)
    }
}
