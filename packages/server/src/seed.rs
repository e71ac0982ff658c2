use std::path::Path;

use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use serde::Deserialize;
use tracing::info;

use crate::entity::{movie, review};

/// One entry of the movie catalogue file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct MovieSeed {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Parse a catalogue: a JSON array of `{title, category, tags?}` objects.
pub fn parse_movie_seeds(raw: &str) -> Result<Vec<MovieSeed>, serde_json::Error> {
    let mut seeds: Vec<MovieSeed> = serde_json::from_str(raw)?;
    seeds.retain_mut(|seed| {
        seed.title = seed.title.trim().to_string();
        !seed.title.is_empty()
    });
    Ok(seeds)
}

/// Insert every movie of the catalogue file whose title is not stored yet.
///
/// Existing movies, including their ratings, are left untouched.
pub async fn seed_movies(db: &DatabaseConnection, path: &Path) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path).await?;
    let seeds = parse_movie_seeds(&raw)?;

    let mut inserted = 0u32;
    for seed in seeds {
        let model = movie::ActiveModel {
            title: Set(seed.title),
            category: Set(seed.category),
            tags: Set(seed.tags),
            rating: Set(0.0),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let result = movie::Entity::insert(model)
            .on_conflict(OnConflict::column(movie::Column::Title).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(0) | Err(DbErr::RecordNotInserted) => {}
            Ok(_) => inserted += 1,
            Err(e) => return Err(e.into()),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new movies from {}", inserted, path.display());
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// Schema sync only creates single-column indexes, so the composite ones are
/// created here. The (`username`, `title`) index backs the one-review-per-user
/// rule, so failing to create it is an error.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_review_username_title")
        .table(review::Entity)
        .col(review::Column::Username)
        .col(review::Column::Title)
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_review_username_title exists");

    // Newest-first listing of a movie's reviews.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_review_title_created")
        .table(review::Entity)
        .col(review::Column::Title)
        .col(review::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_review_title_created exists"),
        Err(e) => tracing::warn!("Failed to create index idx_review_title_created: {}", e),
    }

    Ok(())
}
