//! Repository tests against PostgreSQL
//!
//! Each test gets a fresh database with the migrations applied. Needs
//! DATABASE_URL pointing at a server where the user may create databases.
//! Run with: cargo test --test repository_tests -- --ignored

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::NaiveDate;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use locallib_server::{
    api,
    config::AppConfig,
    models::{author::AuthorForm, book::BookForm, enums::LoanStatus, pagination::PageRequest},
    repository::Repository,
    services::{session::MemorySessionStore, Services},
    AppError, AppState,
};

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

async fn add_user(pool: &PgPool, username: &str) -> i32 {
    sqlx::query_scalar("INSERT INTO users (username, password_hash) VALUES ($1, '') RETURNING id")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn add_author(repository: &Repository, last_name: &str) -> i32 {
    let form = AuthorForm {
        first_name: "Test".to_string(),
        last_name: last_name.to_string(),
        date_of_birth: None,
        date_of_death: None,
    };
    repository.authors.create(&form).await.unwrap().id
}

async fn add_book(repository: &Repository, title: &str, author_id: Option<i32>) -> i32 {
    let form = BookForm {
        title: title.to_string(),
        author_id,
        summary: String::new(),
        isbn: "9780441013593".to_string(),
        genre_ids: vec![],
    };
    repository.books.create(&form).await.unwrap().id
}

async fn add_copy(
    pool: &PgPool,
    book_id: i32,
    status: LoanStatus,
    due_back: Option<NaiveDate>,
    borrower_id: Option<i32>,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO book_instances (id, book_id, imprint, due_back, status, borrower_id) VALUES ($1, $2, 'Ace, 1990', $3, $4, $5)",
    )
    .bind(id)
    .bind(book_id)
    .bind(due_back)
    .bind(status)
    .bind(borrower_id)
    .execute(pool)
    .await
    .unwrap();
    id
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_available_counts_status_a_only(pool: PgPool) {
    let repository = Repository::new(pool.clone());
    let book = add_book(&repository, "Dune", None).await;
    let reader = add_user(&pool, "reader").await;

    add_copy(&pool, book, LoanStatus::Available, None, None).await;
    add_copy(&pool, book, LoanStatus::Available, None, None).await;
    add_copy(&pool, book, LoanStatus::OnLoan, day(2024, 3, 1), Some(reader)).await;
    add_copy(&pool, book, LoanStatus::Maintenance, None, None).await;
    add_copy(&pool, book, LoanStatus::Reserved, None, None).await;

    assert_eq!(repository.book_instances.count().await.unwrap(), 5);
    assert_eq!(
        repository.book_instances.count_by_status(LoanStatus::Available).await.unwrap(),
        2
    );
    assert_eq!(
        repository.book_instances.count_by_status(LoanStatus::OnLoan).await.unwrap(),
        1
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_borrower_rejected_on_copy_not_on_loan(pool: PgPool) {
    let repository = Repository::new(pool.clone());
    let book = add_book(&repository, "Dune", None).await;
    let reader = add_user(&pool, "reader").await;

    let result = sqlx::query(
        "INSERT INTO book_instances (id, book_id, imprint, status, borrower_id) VALUES ($1, $2, 'x', 'a', $3)",
    )
    .bind(Uuid::new_v4())
    .bind(book)
    .bind(reader)
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_loans_ordered_by_due_date_and_scoped_to_borrower(pool: PgPool) {
    let repository = Repository::new(pool.clone());
    let book = add_book(&repository, "Dune", None).await;
    let alice = add_user(&pool, "alice").await;
    let bob = add_user(&pool, "bob").await;

    add_copy(&pool, book, LoanStatus::OnLoan, day(2024, 3, 10), Some(alice)).await;
    add_copy(&pool, book, LoanStatus::OnLoan, day(2024, 3, 1), Some(bob)).await;
    add_copy(&pool, book, LoanStatus::OnLoan, day(2024, 2, 20), Some(alice)).await;
    add_copy(&pool, book, LoanStatus::OnLoan, None, Some(alice)).await;
    add_copy(&pool, book, LoanStatus::Available, day(2024, 1, 1), None).await;
    add_copy(&pool, book, LoanStatus::Reserved, day(2024, 1, 2), None).await;

    let (all, total) = repository
        .book_instances
        .list_on_loan(None, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(total, 4);
    let due: Vec<_> = all.iter().map(|copy| copy.due_back).collect();
    assert_eq!(due, vec![day(2024, 2, 20), day(2024, 3, 1), day(2024, 3, 10), None]);
    assert!(all.iter().all(|copy| copy.status == LoanStatus::OnLoan));
    assert_eq!(all[0].book_title, "Dune");

    let (mine, total) = repository
        .book_instances
        .list_on_loan(Some(alice), PageRequest::first())
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert!(mine.iter().all(|copy| copy.borrower_id == Some(alice)));
    assert_eq!(mine[0].due_back, day(2024, 2, 20));
    assert_eq!(mine[0].borrower_username.as_deref(), Some("alice"));
    // long past due
    assert!(mine[0].is_overdue);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_renewal_touches_due_back_only(pool: PgPool) {
    let repository = Repository::new(pool.clone());
    let book = add_book(&repository, "Dune", None).await;
    let reader = add_user(&pool, "reader").await;
    let copy = add_copy(&pool, book, LoanStatus::OnLoan, day(2024, 1, 5), Some(reader)).await;

    let renewed = repository
        .book_instances
        .set_due_back(copy, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(renewed.due_back, day(2024, 2, 1));
    assert_eq!(renewed.status, LoanStatus::OnLoan);
    assert_eq!(renewed.borrower_id, Some(reader));

    let missing = repository
        .book_instances
        .set_due_back(Uuid::new_v4(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_author_listing_pages(pool: PgPool) {
    let repository = Repository::new(pool.clone());
    for n in 0..12 {
        add_author(&repository, &format!("Author{:02}", n)).await;
    }

    let second = PageRequest::new(Some(2)).unwrap();
    let (authors, total) = repository.authors.list(second).await.unwrap();
    assert_eq!(total, 12);
    let names: Vec<_> = authors.iter().map(|a| a.last_name.as_str()).collect();
    assert_eq!(names, vec!["Author10", "Author11"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_referenced_records_cannot_be_deleted(pool: PgPool) {
    let repository = Repository::new(pool.clone());
    let author = add_author(&repository, "Herbert").await;
    let book = add_book(&repository, "Dune", Some(author)).await;
    add_copy(&pool, book, LoanStatus::Available, None, None).await;

    assert!(matches!(
        repository.authors.delete(author).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        repository.books.delete(book).await,
        Err(AppError::Conflict(_))
    ));
    assert_eq!(repository.authors.count().await.unwrap(), 1);
    assert_eq!(repository.books.count().await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_delete_referenced_author_over_http(pool: PgPool) {
    let repository = Repository::new(pool.clone());
    let author = add_author(&repository, "Herbert").await;
    let lonely = add_author(&repository, "Nobody").await;
    add_book(&repository, "Dune", Some(author)).await;

    let config = AppConfig::default();
    let services = Services::new(repository, Arc::new(MemorySessionStore::new()), &config);
    let app = api::router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    });

    let delete = |id: i32| {
        Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/v1/authors/{}", id))
            .body(Body::empty())
            .unwrap()
    };

    let referenced = app.clone().oneshot(delete(author)).await.unwrap();
    assert_eq!(referenced.status(), StatusCode::CONFLICT);

    let removed = app.oneshot(delete(lonely)).await.unwrap();
    assert_eq!(removed.status(), StatusCode::SEE_OTHER);
}
