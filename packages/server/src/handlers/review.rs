use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use filmtweet_common::{Review, ReviewFilter, ReviewId};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::review::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Reviews",
    operation_id = "listReviews",
    summary = "List reviews",
    description = "Returns reviews newest first, optionally restricted to one movie title and/or one author.",
    params(ReviewListQuery),
    responses(
        (status = 200, description = "Matching reviews", body = Vec<Review>),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<Review>>, AppError> {
    let filter = ReviewFilter {
        title: query.title,
        username: query.username,
    };
    Ok(Json(state.reviews.list(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Reviews",
    operation_id = "getReview",
    summary = "Get a review by ID",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review", body = Review),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_review(
    State(state): State<AppState>,
    AppPath(id): AppPath<ReviewId>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(state.reviews.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Reviews",
    operation_id = "createReview",
    summary = "Publish a review",
    description = "Publishes the caller's review of a movie and returns the movie's recomputed rating. Each user may review a movie once. The author is always the token's subject.",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review published", body = CreateReviewResponse),
        (status = 400, description = "Invalid input (VALIDATION_ERROR) or unknown movie (MOVIE_NOT_FOUND)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING)", body = ErrorBody),
        (status = 409, description = "Already reviewed (CONFLICT)", body = ErrorBody),
        (status = 500, description = "Review stored but rating recompute failed (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_review(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let identity = auth_user.as_ref().map(AuthUser::identity);
    let created = state
        .reviews
        .create(identity.as_ref(), payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReviewResponse {
            review: created.review,
            movie_rating: created.movie_rating.value(),
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Reviews",
    operation_id = "updateReview",
    summary = "Edit a review",
    description = "Changes the comment and/or rating of one of the caller's reviews. Omitted fields keep their value.",
    params(("id" = i32, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = UpdateReviewResponse),
        (status = 400, description = "Invalid rating (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_review(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    AppPath(id): AppPath<ReviewId>,
    AppJson(payload): AppJson<UpdateReviewRequest>,
) -> Result<Json<UpdateReviewResponse>, AppError> {
    let identity = auth_user.as_ref().map(AuthUser::identity);
    let updated = state
        .reviews
        .update(identity.as_ref(), id, payload.into())
        .await?;

    Ok(Json(UpdateReviewResponse {
        message: "Review updated".into(),
        review: updated.review,
        movie_rating: updated.movie_rating.value(),
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Reviews",
    operation_id = "deleteReview",
    summary = "Delete a review",
    description = "Removes one of the caller's reviews and returns the movie's recomputed rating, 0 when no reviews remain.",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = DeleteReviewResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_review(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    AppPath(id): AppPath<ReviewId>,
) -> Result<Json<DeleteReviewResponse>, AppError> {
    let identity = auth_user.as_ref().map(AuthUser::identity);
    let deleted = state.reviews.delete(identity.as_ref(), id).await?;

    Ok(Json(DeleteReviewResponse {
        message: "Review deleted".into(),
        movie_rating: deleted.movie_rating.value(),
    }))
}
