//! Genres repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::conflict_on_constraint;
use crate::{
    error::AppResult,
    models::genre::{Genre, GenreForm},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn count(&self) -> AppResult<i64>;

    /// All genres ordered by name
    async fn list(&self) -> AppResult<Vec<Genre>>;

    /// Fails with `Conflict` on a duplicate name
    async fn create(&self, form: &GenreForm) -> AppResult<Genre>;
}

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreStore for GenresRepository {
    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    async fn create(&self, form: &GenreForm) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("INSERT INTO genres (name) VALUES ($1) RETURNING id, name")
            .bind(form.name.trim())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_constraint(e, format!("Genre '{}' already exists", form.name.trim())))
    }
}
