//! Catalog service: home page counters, book/author/genre listings and record management

use std::sync::Arc;

use chrono::NaiveDate;
use validator::Validate;

use super::session::SessionStore;
use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetail, AuthorForm, AuthorFormDefaults},
        book::{Book, BookDetail, BookForm},
        dashboard::Dashboard,
        enums::LoanStatus,
        genre::{Genre, GenreForm},
        pagination::{PageRequest, Paginated},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    sessions: Arc<dyn SessionStore>,
    default_date_of_death: NaiveDate,
}

impl CatalogService {
    pub fn new(
        repository: Repository,
        sessions: Arc<dyn SessionStore>,
        default_date_of_death: NaiveDate,
    ) -> Self {
        Self {
            repository,
            sessions,
            default_date_of_death,
        }
    }

    /// Verify the database answers
    pub async fn check_database(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    /// Catalog counters for the home page; counts this visit in the caller's session
    pub async fn dashboard(&self, session_id: &str) -> AppResult<Dashboard> {
        let (num_books, num_instances, num_instances_available, num_authors, num_genres) = tokio::try_join!(
            self.repository.books.count(),
            self.repository.book_instances.count(),
            self.repository.book_instances.count_by_status(LoanStatus::Available),
            self.repository.authors.count(),
            self.repository.genres.count(),
        )?;

        let num_visits = self.sessions.record_visit(session_id).await?;

        Ok(Dashboard {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_genres,
            num_visits,
        })
    }

    // ---------------------------------------------------------------------
    // Books
    // ---------------------------------------------------------------------

    pub async fn list_books(&self, page: PageRequest) -> AppResult<Paginated<Book>> {
        let (books, total) = self.repository.books.list(page).await?;
        Paginated::new(books, total, page)
    }

    /// Book with its author, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let genres = self.repository.books.genres_of(id).await?;
        let instances = self.repository.book_instances.list_for_book(id).await?;

        Ok(BookDetail {
            book,
            author,
            genres,
            instances,
        })
    }

    pub async fn create_book(&self, form: BookForm) -> AppResult<Book> {
        form.check()?;
        let book = self.repository.books.create(&form).await?;
        tracing::info!("Created book id={} title={:?}", book.id, book.title);
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, form: BookForm) -> AppResult<Book> {
        form.check()?;
        let book = self.repository.books.update(id, &form).await?;
        tracing::info!("Updated book id={}", id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Authors
    // ---------------------------------------------------------------------

    pub async fn list_authors(&self, page: PageRequest) -> AppResult<Paginated<Author>> {
        let (authors, total) = self.repository.authors.list(page).await?;
        Paginated::new(authors, total, page)
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetail { author, books })
    }

    /// Suggestions shown on an empty author form
    pub fn author_form_defaults(&self) -> AuthorFormDefaults {
        AuthorFormDefaults {
            date_of_death: self.default_date_of_death,
        }
    }

    pub async fn create_author(&self, form: AuthorForm) -> AppResult<Author> {
        form.validate()?;
        let author = self.repository.authors.create(&form).await?;
        tracing::info!("Created author id={} ({})", author.id, author.display_name());
        Ok(author)
    }

    pub async fn update_author(&self, id: i32, form: AuthorForm) -> AppResult<Author> {
        form.validate()?;
        let author = self.repository.authors.update(id, &form).await?;
        tracing::info!("Updated author id={}", id);
        Ok(author)
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author id={}", id);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Genres
    // ---------------------------------------------------------------------

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, form: GenreForm) -> AppResult<Genre> {
        form.validate()?;
        let genre = self.repository.genres.create(&form).await?;
        tracing::info!("Created genre id={} name={:?}", genre.id, genre.name);
        Ok(genre)
    }
}
