//! Home page and genre endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        dashboard::Dashboard,
        genre::{Genre, GenreForm},
    },
};

/// Accept a client-supplied session id only if it looks like one we issued
fn usable_session_id(value: &str) -> bool {
    !value.is_empty() && value.len() <= 64 && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Catalog counters and the caller's visit count
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog counters; sets the session cookie", body = Dashboard)
    )
)]
pub async fn dashboard(
    State(state): State<crate::AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<Dashboard>)> {
    let cookie_name = state.config.session.cookie_name.clone();

    let session_id = jar
        .get(&cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| usable_session_id(value))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let dashboard = state.services.catalog.dashboard(&session_id).await?;

    // Lives as long as the stored counter
    let ttl = i64::try_from(state.config.session.ttl_seconds).unwrap_or(i64::MAX);
    let max_age = time::Duration::seconds(ttl);
    let cookie = Cookie::build((cookie_name, session_id))
        .path("/")
        .http_only(true)
        .max_age(max_age)
        .build();

    Ok((jar.add(cookie), Json(dashboard)))
}

/// List all genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "catalog",
    responses(
        (status = 200, description = "All genres, by name", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/genres",
    tag = "catalog",
    request_body = GenreForm,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 409, description = "Genre already exists"),
        (status = 422, description = "Invalid form")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    Json(form): Json<GenreForm>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let genre = state.services.catalog.create_genre(form).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}
