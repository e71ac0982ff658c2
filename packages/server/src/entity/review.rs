use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One review per (`username`, `title`), enforced by `idx_review_username_title`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub username: String,

    /// Title of the reviewed movie.
    #[sea_orm(indexed)]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub review: String,

    pub rating: f64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for filmtweet_common::Review {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            title: m.title,
            review: m.review,
            rating: m.rating,
            created_at: m.created_at,
        }
    }
}
