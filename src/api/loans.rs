//! Loan listings and renewal endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Local;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::LoanedCopy,
        pagination::{PageQuery, PageRequest, Paginated},
        renewal::{RenewBookForm, RenewalStep},
    },
    services::loans::RenewalOutcome,
};

use super::{routes, AuthenticatedUser, CanMarkReturned};

/// Copies on loan to the current user
#[utoipa::path(
    get,
    path = "/mybooks",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's loans, soonest due first", body = Paginated<LoanedCopy>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<LoanedCopy>>> {
    let page = PageRequest::try_from(query)?;
    let loans = state.services.loans.loaned_to(claims.user_id, page).await?;
    Ok(Json(loans))
}

/// Every copy on loan (librarian view)
// Only authentication is checked here, no capability.
#[utoipa::path(
    get,
    path = "/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All loans, soonest due first", body = Paginated<LoanedCopy>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<LoanedCopy>>> {
    let page = PageRequest::try_from(query)?;
    let loans = state.services.loans.all_on_loan(page).await?;
    Ok(Json(loans))
}

/// Renewal form for a copy, with the proposed date
#[utoipa::path(
    get,
    path = "/bookinstances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy and proposed renewal date", body = RenewalStep),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing catalog.can_mark_returned"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    CanMarkReturned(_claims): CanMarkReturned,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalStep>> {
    let today = Local::now().date_naive();
    let step = state.services.loans.renewal_form(id, today).await?;
    Ok(Json(step))
}

/// Submit a new due date for a copy
#[utoipa::path(
    post,
    path = "/bookinstances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body = RenewBookForm,
    responses(
        (status = 303, description = "Due date saved, redirect to the book listing"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing catalog.can_mark_returned"),
        (status = 404, description = "Book instance not found"),
        (status = 422, description = "Date rejected; form echoed back with errors", body = RenewalStep)
    )
)]
pub async fn submit_renewal(
    State(state): State<crate::AppState>,
    CanMarkReturned(claims): CanMarkReturned,
    Path(id): Path<Uuid>,
    Json(form): Json<RenewBookForm>,
) -> AppResult<Response> {
    let today = Local::now().date_naive();

    match state.services.loans.submit_renewal(id, form, today).await? {
        RenewalOutcome::Renewed(_) => {
            tracing::info!("Copy {} renewed by {}", id, claims.sub);
            Ok(Redirect::to(routes::BOOKS).into_response())
        }
        RenewalOutcome::Rejected(step) => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(step)).into_response())
        }
    }
}
