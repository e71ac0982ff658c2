use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub title: String,

    #[sea_orm(indexed)]
    pub category: String,

    pub tags: Vec<String>,

    /// Written only through the rating aggregator.
    #[sea_orm(default_value = 0.0)]
    pub rating: f64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for filmtweet_common::Movie {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            category: m.category,
            tags: m.tags,
            rating: m.rating,
            created_at: m.created_at,
        }
    }
}
