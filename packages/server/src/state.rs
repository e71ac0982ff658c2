use std::sync::Arc;

use filmtweet_common::ReviewService;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::store::SeaOrmStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    /// Review lifecycle bound to the database-backed stores.
    pub reviews: ReviewService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let store = Arc::new(SeaOrmStore::new(db.clone()));
        Self {
            reviews: ReviewService::new(store.clone(), store),
            db,
            config,
        }
    }
}
