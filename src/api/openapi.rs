//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, catalog, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LocalLib API",
        version = "1.0.0",
        description = "Local library catalog REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Catalog
        catalog::dashboard,
        catalog::list_genres,
        catalog::create_genre,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::author_form_defaults,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Loans
        loans::my_loans,
        loans::all_loans,
        loans::renewal_form,
        loans::submit_renewal,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Catalog
            crate::models::dashboard::Dashboard,
            crate::models::genre::Genre,
            crate::models::genre::GenreForm,
            crate::models::book::Book,
            crate::models::book::BookDetail,
            crate::models::book::BookForm,
            crate::models::author::Author,
            crate::models::author::AuthorDetail,
            crate::models::author::AuthorForm,
            crate::models::author::AuthorFormDefaults,
            crate::models::book_instance::BookInstance,
            crate::models::enums::LoanStatus,
            // Loans
            crate::models::book_instance::LoanedCopy,
            crate::models::renewal::RenewBookForm,
            crate::models::renewal::RenewalStep,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "catalog", description = "Home page counters and genres"),
        (name = "books", description = "Book records"),
        (name = "authors", description = "Author records"),
        (name = "loans", description = "Loans and renewals")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
