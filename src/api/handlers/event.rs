//! Event endpoint handlers: create, list, get.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::Requester;
use crate::api::dto::{CreateEventRequest, EventListResponse, EventResponse};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ApiError, ErrorResponse};

/// `POST /events` — Create an event.
///
/// # Errors
///
/// Returns [`ApiError`] unless the requester is an organizer and the
/// fields validate.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid event fields", body = ErrorResponse),
        (status = 401, description = "Requester is not an organizer", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Requester(requester): Requester,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .events
        .create_event(
            &requester,
            req.name,
            req.description,
            req.genre,
            req.category,
            req.price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// `GET /events` — List all events.
///
/// # Errors
///
/// Returns [`ApiError`] on persistence failures.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    responses(
        (status = 200, description = "All events, newest first", body = EventListResponse),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let events = state.events.list_events().await?;
    Ok(Json(EventListResponse::from(events)))
}

/// `GET /events/:id` — Get event details.
///
/// # Errors
///
/// Returns [`ApiError::EventNotFound`] when the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get event details",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.events.get_event(EventId::from_uuid(id)).await?;
    Ok(Json(EventResponse::from(event)))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route("/events/{id}", get(get_event))
}
