//! PostgreSQL-backed movie and review stores.

use std::collections::BTreeSet;

use async_trait::async_trait;
use filmtweet_common::model::{NewReview, ReviewChanges};
use filmtweet_common::storage::{MovieStore, ReviewStore, StoreError};
use filmtweet_common::{AggregateRating, Movie, Review, ReviewFilter, ReviewId};
use sea_orm::prelude::Expr;
use sea_orm::*;

use crate::entity::{movie, review};

fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// [`MovieStore`] and [`ReviewStore`] over a SeaORM connection.
///
/// Review uniqueness relies on the `idx_review_username_title` index created
/// by [`crate::seed::ensure_indexes`].
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieStore for SeaOrmStore {
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        let model = movie::Entity::find()
            .filter(movie::Column::Title.eq(title))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(model.map(Movie::from))
    }

    async fn update_rating(
        &self,
        title: &str,
        rating: AggregateRating,
    ) -> Result<bool, StoreError> {
        let result = movie::Entity::update_many()
            .col_expr(movie::Column::Rating, Expr::value(rating.value()))
            .filter(movie::Column::Title.eq(title))
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl ReviewStore for SeaOrmStore {
    async fn find(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError> {
        let mut select = review::Entity::find();
        if let Some(ref title) = filter.title {
            select = select.filter(review::Column::Title.eq(title.as_str()));
        }
        if let Some(ref username) = filter.username {
            select = select.filter(review::Column::Username.eq(username.as_str()));
        }

        let models = select
            .order_by_desc(review::Column::CreatedAt)
            .order_by_desc(review::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(models.into_iter().map(Review::from).collect())
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, StoreError> {
        let model = review::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(model.map(Review::from))
    }

    async fn insert(&self, new: NewReview) -> Result<Review, StoreError> {
        let model = review::ActiveModel {
            username: Set(new.username),
            title: Set(new.title),
            review: Set(new.review),
            rating: Set(new.rating),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Duplicate(detail),
            _ => backend(e),
        })?;
        Ok(model.into())
    }

    async fn update_by_id(
        &self,
        id: ReviewId,
        changes: ReviewChanges,
    ) -> Result<Option<Review>, StoreError> {
        let Some(model) = review::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?
        else {
            return Ok(None);
        };

        let mut active: review::ActiveModel = model.into();
        if let Some(text) = changes.review {
            active.review = Set(text);
        }
        if let Some(rating) = changes.rating {
            active.rating = Set(rating);
        }

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(model.into())),
            // Deleted between the read and the write.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(backend(e)),
        }
    }

    async fn delete_by_id(&self, id: ReviewId) -> Result<bool, StoreError> {
        let result = review::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected > 0)
    }

    async fn distinct_titles(&self) -> Result<BTreeSet<String>, StoreError> {
        let titles: Vec<String> = review::Entity::find()
            .select_only()
            .column(review::Column::Title)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(titles.into_iter().collect())
    }
}
