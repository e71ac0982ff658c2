use std::collections::BTreeMap;

use filmtweet_common::review::RecalculationSummary;
use serde::{Deserialize, Serialize};

/// Result of a full rating recalculation.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecalculateResponse {
    /// Number of movies whose rating was recomputed.
    #[schema(example = 2)]
    pub recomputed: usize,
    /// New rating per movie title.
    #[schema(example = json!({"Heat": 4.0, "Interstellar": 4.5}))]
    pub ratings: BTreeMap<String, f64>,
}

impl From<RecalculationSummary> for RecalculateResponse {
    fn from(summary: RecalculationSummary) -> Self {
        Self {
            recomputed: summary.recomputed(),
            ratings: summary
                .ratings
                .into_iter()
                .map(|(title, rating)| (title, rating.value()))
                .collect(),
        }
    }
}
