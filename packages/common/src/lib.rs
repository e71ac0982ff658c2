//! Storage-agnostic core of the movie review service: the rating aggregator,
//! the review lifecycle and the store contracts they run against.

pub mod model;
pub mod rating;
pub mod review;
pub mod storage;

pub use model::{Identity, Movie, Review, ReviewFilter, ReviewId};
pub use rating::{AggregateRating, RatingAggregator};
pub use review::{ReviewError, ReviewService};
