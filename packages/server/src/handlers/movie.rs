use axum::{
    Json,
    extract::{Query, State},
};
use filmtweet_common::Movie;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::movie;
use crate::error::{AppError, ErrorBody};
use crate::extractors::path::AppPath;
use crate::models::movie::{MovieListQuery, has_any_tag};
use crate::models::shared::escape_like;
use crate::state::AppState;

/// Case-insensitive "title contains" condition.
fn title_contains(term: &str) -> Condition {
    Condition::all().add(
        Expr::expr(Func::lower(Expr::col(movie::Column::Title))).like(
            LikeExpr::new(format!("%{}%", escape_like(&term.to_lowercase()))).escape('\\'),
        ),
    )
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Movies",
    operation_id = "listMovies",
    summary = "List movies",
    description = "Returns all movies ordered by title. `search` matches a case-insensitive substring of the title, `category` an exact category (`*` for any) and `tags` any of a comma-separated list.",
    params(MovieListQuery),
    responses(
        (status = 200, description = "Matching movies", body = Vec<Movie>),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> Result<Json<Vec<Movie>>, AppError> {
    let mut select = movie::Entity::find();

    if let Some(term) = query.search_term() {
        select = select.filter(title_contains(term));
    }
    if let Some(category) = query.category_filter() {
        select = select.filter(movie::Column::Category.eq(category));
    }

    let wanted = query.tag_list();
    let movies = select
        .order_by_asc(movie::Column::Title)
        .all(&state.db)
        .await?
        .into_iter()
        .filter(|m| has_any_tag(&m.tags, &wanted))
        .map(Movie::from)
        .collect();

    Ok(Json(movies))
}

#[utoipa::path(
    get,
    path = "/{title}",
    tag = "Movies",
    operation_id = "getMovie",
    summary = "Find a movie by title",
    description = "Returns the first movie, in title order, whose title contains the given text case-insensitively.",
    params(("title" = String, Path, description = "Full or partial movie title")),
    responses(
        (status = 200, description = "Movie details", body = Movie),
        (status = 404, description = "No matching movie (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(title = %title))]
pub async fn get_movie(
    State(state): State<AppState>,
    AppPath(title): AppPath<String>,
) -> Result<Json<Movie>, AppError> {
    let term = title.trim();
    if term.is_empty() {
        return Err(AppError::Validation("Movie title is required".into()));
    }

    let model = movie::Entity::find()
        .filter(title_contains(term))
        .order_by_asc(movie::Column::Title)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".into()))?;

    Ok(Json(model.into()))
}
