use filmtweet_common::Review;
use filmtweet_common::review::{RawRating, ReviewDraft, ReviewPatch};
use serde::{Deserialize, Serialize};

/// Request body for publishing a review.
///
/// Fields are optional at parse time so that missing values are reported
/// in the same order the review service checks them. Any `username` in the
/// body is ignored; the author is always the token's subject.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateReviewRequest {
    /// Exact title of the movie. Also accepted as `movie`.
    #[serde(alias = "movie")]
    #[schema(example = "Interstellar")]
    pub title: Option<String>,
    /// Free-text comment. Also accepted as `comment`.
    #[serde(alias = "comment")]
    #[schema(example = "Stunning.")]
    pub review: Option<String>,
    /// Number between 0 and 5 inclusive.
    #[schema(value_type = f64, example = 4.5)]
    pub rating: Option<RawRating>,
}

impl From<CreateReviewRequest> for ReviewDraft {
    fn from(req: CreateReviewRequest) -> Self {
        ReviewDraft {
            title: req.title,
            comment: req.review,
            rating: req.rating,
        }
    }
}

/// Request body for editing a review. Omitted fields keep their value.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateReviewRequest {
    /// New comment. Also accepted as `comment`.
    #[serde(alias = "comment")]
    #[schema(example = "Even better the second time.")]
    pub review: Option<String>,
    #[schema(value_type = Option<f64>, example = 5.0)]
    pub rating: Option<RawRating>,
}

impl From<UpdateReviewRequest> for ReviewPatch {
    fn from(req: UpdateReviewRequest) -> Self {
        ReviewPatch {
            comment: req.review,
            rating: req.rating,
        }
    }
}

/// Query parameters for listing reviews.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewListQuery {
    /// Exact movie title.
    pub title: Option<String>,
    /// Author username.
    pub username: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateReviewResponse {
    pub review: Review,
    /// Rating of the reviewed movie after this review was counted.
    #[serde(rename = "movieRating")]
    #[schema(example = 4.5)]
    pub movie_rating: f64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateReviewResponse {
    #[schema(example = "Review updated")]
    pub message: String,
    pub review: Review,
    #[serde(rename = "movieRating")]
    #[schema(example = 3.5)]
    pub movie_rating: f64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteReviewResponse {
    #[schema(example = "Review deleted")]
    pub message: String,
    /// Rating of the movie without the deleted review. 0 when none remain.
    #[serde(rename = "movieRating")]
    #[schema(example = 3.0)]
    pub movie_rating: f64,
}
