use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned review identifier.
pub type ReviewId = i32;

/// A movie as seen by readers of the store.
///
/// `rating` is derived from the movie's reviews and can only be written
/// through [`crate::rating::RatingAggregator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Movie {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Interstellar")]
    pub title: String,
    #[schema(example = "sci-fi")]
    pub category: String,
    #[schema(example = json!(["space", "drama"]))]
    pub tags: Vec<String>,
    /// Mean of all review ratings, rounded to one decimal. 0 when unreviewed.
    #[schema(example = 4.5)]
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

/// A single user's review of a movie.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Review {
    #[schema(example = 7)]
    pub id: ReviewId,
    /// Author. Always taken from the verified identity, never from a request body.
    #[schema(example = "alice")]
    pub username: String,
    /// Title of the reviewed movie.
    #[schema(example = "Interstellar")]
    pub title: String,
    /// Free-text comment, empty when the author left none.
    #[schema(example = "Stunning.")]
    pub review: String,
    #[schema(example = 5.0)]
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.username == identity.username
    }
}

/// The authenticated actor behind a request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Fields of a review about to be inserted.
#[derive(Clone, Debug, PartialEq)]
pub struct NewReview {
    pub username: String,
    pub title: String,
    pub review: String,
    pub rating: f64,
}

/// Partial update of a review. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewChanges {
    pub review: Option<String>,
    pub rating: Option<f64>,
}

impl ReviewChanges {
    pub fn is_empty(&self) -> bool {
        self.review.is_none() && self.rating.is_none()
    }
}

/// Review lookup criteria. Empty filter matches every review.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub title: Option<String>,
    pub username: Option<String>,
}

impl ReviewFilter {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            username: None,
        }
    }

    pub fn by_author_and_title(username: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            username: Some(username.into()),
        }
    }

    pub fn matches(&self, review: &Review) -> bool {
        self.title.as_deref().is_none_or(|t| review.title == t)
            && self.username.as_deref().is_none_or(|u| review.username == u)
    }
}
