//! In-memory movie and review store.
//!
//! Backs the unit tests and embedded use. Uniqueness of (`username`, `title`)
//! is checked under the write lock, so concurrent inserts cannot both succeed.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::error::StoreError;
use super::traits::{MovieStore, ReviewStore};
use crate::model::{Movie, NewReview, Review, ReviewChanges, ReviewFilter, ReviewId};
use crate::rating::AggregateRating;

fn lock_err(context: &'static str) -> StoreError {
    StoreError::Backend(format!("poisoned lock: {context}"))
}

#[derive(Debug, Default)]
struct State {
    movies: BTreeMap<String, Movie>,
    reviews: BTreeMap<ReviewId, Review>,
    next_movie_id: i32,
    next_review_id: ReviewId,
}

/// Thread-safe in-memory implementation of [`MovieStore`] and [`ReviewStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a movie with a zero rating. Movies are keyed by title.
    pub fn insert_movie(
        &self,
        title: &str,
        category: &str,
        tags: &[&str],
    ) -> Result<Movie, StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("insert_movie"))?;
        let title = title.trim().to_string();
        if state.movies.contains_key(&title) {
            return Err(StoreError::Duplicate(format!("movie '{title}'")));
        }

        state.next_movie_id += 1;
        let movie = Movie {
            id: state.next_movie_id,
            title: title.clone(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            rating: 0.0,
            created_at: Utc::now(),
        };
        state.movies.insert(title, movie.clone());
        Ok(movie)
    }

    /// All movies ordered by title.
    pub fn movies(&self) -> Result<Vec<Movie>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("movies"))?;
        Ok(state.movies.values().cloned().collect())
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("find_by_title"))?;
        Ok(state.movies.get(title).cloned())
    }

    async fn update_rating(
        &self,
        title: &str,
        rating: AggregateRating,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("update_rating"))?;
        match state.movies.get_mut(title) {
            Some(movie) => {
                movie.rating = rating.value();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn find(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("find"))?;
        // Ids grow monotonically, so reverse id order is newest first.
        Ok(state
            .reviews
            .values()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("find_by_id"))?;
        Ok(state.reviews.get(&id).cloned())
    }

    async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("insert"))?;
        let taken = state
            .reviews
            .values()
            .any(|r| r.username == review.username && r.title == review.title);
        if taken {
            return Err(StoreError::Duplicate(format!(
                "review by '{}' for '{}'",
                review.username, review.title
            )));
        }

        state.next_review_id += 1;
        let stored = Review {
            id: state.next_review_id,
            username: review.username,
            title: review.title,
            review: review.review,
            rating: review.rating,
            created_at: Utc::now(),
        };
        state.reviews.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_by_id(
        &self,
        id: ReviewId,
        changes: ReviewChanges,
    ) -> Result<Option<Review>, StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("update_by_id"))?;
        let Some(review) = state.reviews.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(text) = changes.review {
            review.review = text;
        }
        if let Some(rating) = changes.rating {
            review.rating = rating;
        }
        Ok(Some(review.clone()))
    }

    async fn delete_by_id(&self, id: ReviewId) -> Result<bool, StoreError> {
        let mut state = self.state.write().map_err(|_| lock_err("delete_by_id"))?;
        Ok(state.reviews.remove(&id).is_some())
    }

    async fn distinct_titles(&self) -> Result<BTreeSet<String>, StoreError> {
        let state = self.state.read().map_err(|_| lock_err("distinct_titles"))?;
        Ok(state.reviews.values().map(|r| r.title.clone()).collect())
    }
}
