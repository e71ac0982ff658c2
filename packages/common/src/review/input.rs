use serde::Deserialize;

use super::error::ReviewError;
use crate::rating::is_valid_rating;

/// A rating exactly as the client sent it.
///
/// Anything that is not a JSON number is kept so that it can be rejected with
/// [`ReviewError::InvalidRating`] in its turn, instead of failing body parsing
/// ahead of the other checks.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawRating {
    Number(f64),
    Other(serde_json::Value),
}

impl RawRating {
    /// Accept finite numbers in `[0, 5]`.
    pub fn validate(&self) -> Result<f64, ReviewError> {
        match *self {
            RawRating::Number(rating) if is_valid_rating(rating) => Ok(rating),
            _ => Err(ReviewError::InvalidRating),
        }
    }
}

impl From<f64> for RawRating {
    fn from(rating: f64) -> Self {
        RawRating::Number(rating)
    }
}

/// Unvalidated input of a review creation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewDraft {
    pub title: Option<String>,
    pub comment: Option<String>,
    pub rating: Option<RawRating>,
}

impl ReviewDraft {
    pub fn new(title: impl Into<String>, rating: impl Into<RawRating>) -> Self {
        Self {
            title: Some(title.into()),
            comment: None,
            rating: Some(rating.into()),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Unvalidated input of a review update. Omitted fields keep their value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewPatch {
    pub comment: Option<String>,
    pub rating: Option<RawRating>,
}
