mod error;
mod input;
mod lifecycle;

pub use error::ReviewError;
pub use input::{RawRating, ReviewDraft, ReviewPatch};
pub use lifecycle::{
    CreatedReview, DeletedReview, RecalculationSummary, ReviewService, UpdatedReview,
};
