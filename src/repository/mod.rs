//! Repository layer for database operations
//!
//! Each entity table sits behind an async store trait so services can be
//! exercised against mocks; the `*Repository` types are the PostgreSQL
//! implementations.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::error::{AppError, AppResult};

pub use authors::AuthorStore;
pub use book_instances::BookInstanceStore;
pub use books::BookStore;
pub use genres::GenreStore;
pub use users::UserStore;

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pool: Option<Pool<Postgres>>,
    pub authors: Arc<dyn AuthorStore>,
    pub books: Arc<dyn BookStore>,
    pub genres: Arc<dyn GenreStore>,
    pub book_instances: Arc<dyn BookInstanceStore>,
    pub users: Arc<dyn UserStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::BookInstancesRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Assemble a repository from arbitrary store implementations (no database pool)
    pub fn from_stores(
        authors: Arc<dyn AuthorStore>,
        books: Arc<dyn BookStore>,
        genres: Arc<dyn GenreStore>,
        book_instances: Arc<dyn BookInstanceStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            pool: None,
            authors,
            books,
            genres,
            book_instances,
            users,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

/// Turn a referential or uniqueness violation into a `Conflict`, pass anything else through
pub(crate) fn conflict_on_constraint(err: sqlx::Error, message: impl Into<String>) -> AppError {
    let code = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned());

    match code.as_deref() {
        Some(FOREIGN_KEY_VIOLATION) | Some(UNIQUE_VIOLATION) => AppError::Conflict(message.into()),
        _ => AppError::Database(err),
    }
}

/// A write referenced a row that does not exist
pub(crate) fn invalid_reference(err: sqlx::Error, message: impl Into<String>) -> AppError {
    let is_fk = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == FOREIGN_KEY_VIOLATION)
        .unwrap_or(false);

    if is_fk {
        AppError::Validation(message.into())
    } else {
        AppError::Database(err)
    }
}
