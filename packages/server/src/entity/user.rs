use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The role assigned to newly registered users.
pub const DEFAULT_ROLE: &str = "member";

/// Role allowed to run administrative maintenance.
pub const ADMIN_ROLE: &str = "admin";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// Stored lowercased.
    #[sea_orm(unique)]
    pub email: String,

    pub password: String,

    pub role: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
