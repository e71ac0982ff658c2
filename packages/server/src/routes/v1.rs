use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/movies", movie_routes())
        .nest("/reviews", review_routes())
        .nest("/admin", admin_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn movie_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::movie::list_movies))
        .routes(routes!(handlers::movie::get_movie))
}

fn review_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::review::list_reviews,
            handlers::review::create_review
        ))
        .routes(routes!(
            handlers::review::get_review,
            handlers::review::update_review,
            handlers::review::delete_review
        ))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::admin::recalculate_ratings))
}
