//! Admin endpoint handlers: cascade deletes and platform stats.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::auth::Requester;
use crate::app_state::AppState;
use crate::domain::{EventId, UserId};
use crate::error::{ApiError, ErrorResponse};
use crate::persistence::TicketCounts;
use crate::service::UserCounts;

/// `DELETE /admin/events/:id` — Delete an event and all its tickets.
///
/// # Errors
///
/// Returns [`ApiError`] for non-admins or a missing event.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/events/{id}",
    tag = "Admin",
    summary = "Delete an event (cascades to its tickets)",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 204, description = "Event and associated tickets deleted"),
        (status = 401, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    state
        .events
        .delete_event(EventId::from_uuid(id), &requester)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /admin/attendees/:id` — Delete an attendee.
///
/// Their tickets are reverted toward availability first.
///
/// # Errors
///
/// Returns [`ApiError`] for non-admins, a missing user, or a target that
/// is not an attendee.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/attendees/{id}",
    tag = "Admin",
    summary = "Delete an attendee and free their tickets",
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 204, description = "Attendee deleted, tickets made available"),
        (status = 400, description = "User is not an attendee", body = ErrorResponse),
        (status = 401, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn delete_attendee(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    state
        .admin
        .remove_attendee(UserId::from_uuid(id), &requester)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /admin/organizers/:id` — Delete an organizer with their events
/// and tickets.
///
/// # Errors
///
/// Returns [`ApiError`] for non-admins, a missing user, or a target that
/// is not an organizer.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/organizers/{id}",
    tag = "Admin",
    summary = "Delete an organizer (cascades to events and tickets)",
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 204, description = "Organizer, events, and tickets deleted"),
        (status = 400, description = "User is not an organizer", body = ErrorResponse),
        (status = 401, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn delete_organizer(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    state
        .admin
        .remove_organizer(UserId::from_uuid(id), &requester)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /admin/stats/tickets` — Platform ticket counts.
///
/// # Errors
///
/// Returns [`ApiError`] for non-admins.
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats/tickets",
    tag = "Admin",
    summary = "Ticket counts",
    responses(
        (status = 200, description = "Total / sold / available counts", body = TicketCounts),
        (status = 401, description = "Admin role required", body = ErrorResponse),
    )
)]
pub async fn ticket_stats(
    State(state): State<AppState>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    let counts = state.admin.ticket_stats(&requester).await?;
    Ok(Json(counts))
}

/// `GET /admin/stats/users` — Organizer and attendee counts.
///
/// # Errors
///
/// Returns [`ApiError`] for non-admins.
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats/users",
    tag = "Admin",
    summary = "User counts per role",
    responses(
        (status = 200, description = "Organizer / attendee counts", body = UserCounts),
        (status = 401, description = "Admin role required", body = ErrorResponse),
    )
)]
pub async fn user_stats(
    State(state): State<AppState>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    let counts = state.admin.user_stats(&requester).await?;
    Ok(Json(counts))
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/events/{id}", delete(delete_event))
        .route("/admin/attendees/{id}", delete(delete_attendee))
        .route("/admin/organizers/{id}", delete(delete_organizer))
        .route("/admin/stats/tickets", get(ticket_stats))
        .route("/admin/stats/users", get(user_stats))
}
