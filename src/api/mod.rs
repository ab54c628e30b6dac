//! API handlers for LocalLib REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod catalog;
pub mod health;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::user::{UserClaims, CAN_MARK_RETURNED},
    AppState,
};

/// Named routes used as redirect targets
pub mod routes {
    pub const API_PREFIX: &str = "/api/v1";
    pub const BOOKS: &str = "/api/v1/books";
    pub const AUTHORS: &str = "/api/v1/authors";
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = state.services.auth.verify_token(token)?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Guard for staff operations on loans: authenticated and holding `catalog.can_mark_returned`.
/// Rejects before the handler runs and before any request body is read.
pub struct CanMarkReturned(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for CanMarkReturned {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        claims.require_perm(CAN_MARK_RETURNED)?;
        Ok(CanMarkReturned(claims))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", axum::routing::post(auth::login))
        .route("/auth/me", get(auth::me))
        // Home page
        .route("/dashboard", get(catalog::dashboard))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .route("/forms/author", get(authors::author_form_defaults))
        // Genres
        .route("/genres", get(catalog::list_genres).post(catalog::create_genre))
        // Loans
        .route("/mybooks", get(loans::my_loans))
        .route("/borrowed", get(loans::all_loans))
        .route(
            "/bookinstances/:id/renew",
            get(loans::renewal_form).post(loans::submit_renewal),
        )
        .with_state(state);

    Router::new()
        .nest(routes::API_PREFIX, api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
