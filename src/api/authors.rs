//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetail, AuthorForm, AuthorFormDefaults},
        pagination::{PageQuery, PageRequest, Paginated},
    },
};

use super::routes;

/// List authors, ten per page
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of authors", body = Paginated<Author>),
        (status = 404, description = "Page out of range")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<Author>>> {
    let page = PageRequest::try_from(query)?;
    let authors = state.services.catalog.list_authors(page).await?;
    Ok(Json(authors))
}

/// Get an author and their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Suggested values for a new author
#[utoipa::path(
    get,
    path = "/forms/author",
    tag = "authors",
    responses(
        (status = 200, description = "Initial form values", body = AuthorFormDefaults)
    )
)]
pub async fn author_form_defaults(State(state): State<crate::AppState>) -> Json<AuthorFormDefaults> {
    Json(state.services.catalog.author_form_defaults())
}

/// Create a new author
// Writes below are open to any caller, no capability is checked.
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorForm,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 422, description = "Invalid form")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    Json(form): Json<AuthorForm>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.services.catalog.create_author(form).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorForm,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found"),
        (status = 422, description = "Invalid form")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(form): Json<AuthorForm>,
) -> AppResult<Json<Author>> {
    let author = state.services.catalog.update_author(id, form).await?;
    Ok(Json(author))
}

/// Delete an author, then go to the author listing
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 303, description = "Author deleted, redirect to the author listing"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Books still reference the author")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    state.services.catalog.delete_author(id).await?;
    Ok(Redirect::to(routes::AUTHORS))
}
