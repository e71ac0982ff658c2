use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::admin::RecalculateResponse;
use crate::state::AppState;
use crate::utils::permission::RATING_RECALCULATE;

#[utoipa::path(
    post,
    path = "/ratings/recalculate",
    tag = "Admin",
    operation_id = "recalculateRatings",
    summary = "Recompute every movie rating",
    description = "Recomputes the rating of each movie that has at least one review, one movie at a time. Repairs ratings left stale by an earlier failure. Requires `rating:recalculate` permission.",
    responses(
        (status = 200, description = "Ratings recomputed", body = RecalculateResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 500, description = "A recompute failed (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn recalculate_ratings(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<RecalculateResponse>, AppError> {
    auth_user.require_permission(RATING_RECALCULATE)?;

    let summary = state.reviews.recalculate_all().await?;
    Ok(Json(summary.into()))
}
