//! Ticket endpoint handlers: create, buy, listings, verify, scan, QR.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::Requester;
use crate::api::dto::{
    CreateTicketRequest, QrCodeResponse, ScanResponse, TicketListResponse, TicketResponse,
    VerificationResponse, VerifyRequest,
};
use crate::app_state::AppState;
use crate::domain::{EventId, TicketId};
use crate::error::{ApiError, ErrorResponse};

/// `POST /tickets/:event_id` — Create a ticket for an owned event.
///
/// # Errors
///
/// Returns [`ApiError`] when the event is missing, the requester does not
/// own it, or the price is invalid.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/{event_id}",
    tag = "Tickets",
    summary = "Create a ticket",
    description = "Creates an available ticket for an event the requester organizes.",
    params(
        ("event_id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = CreateTicketRequest,
    responses(
        (status = 201, description = "Ticket created", body = TicketResponse),
        (status = 401, description = "Requester does not own the event", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    Path(event_id): Path<uuid::Uuid>,
    Requester(requester): Requester,
    Json(req): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = state
        .tickets
        .create_ticket(
            EventId::from_uuid(event_id),
            &requester,
            req.ticket_type,
            req.price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TicketResponse::from(ticket))))
}

/// `POST /tickets/buy/:ticket_id` — Buy a ticket.
///
/// # Errors
///
/// Returns [`ApiError`] when the ticket is missing or no longer available.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/buy/{ticket_id}",
    tag = "Tickets",
    summary = "Buy a ticket",
    description = "Allocates an available ticket to the requester. On success the returned \
                   ticket carries its assigned ticket number and QR payload, and a \
                   confirmation email is dispatched in the background.",
    params(
        ("ticket_id" = uuid::Uuid, Path, description = "Ticket UUID"),
    ),
    responses(
        (status = 200, description = "Ticket purchased", body = TicketResponse),
        (status = 404, description = "Ticket not found", body = ErrorResponse),
        (status = 409, description = "Ticket is not available", body = ErrorResponse),
    )
)]
pub async fn buy_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<uuid::Uuid>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = state
        .tickets
        .buy_ticket(TicketId::from_uuid(ticket_id), &requester)
        .await?;

    Ok(Json(TicketResponse::from(ticket)))
}

/// `GET /tickets/mine` — List the requester's bought tickets.
///
/// # Errors
///
/// Returns [`ApiError`] on persistence failures.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/mine",
    tag = "Tickets",
    summary = "List my tickets",
    responses(
        (status = 200, description = "Tickets bought by the requester", body = TicketListResponse),
    )
)]
pub async fn my_tickets(
    State(state): State<AppState>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = state.tickets.my_tickets(&requester).await?;
    Ok(Json(TicketListResponse::from(tickets)))
}

/// `GET /tickets/available/:event_id` — List an event's available tickets.
///
/// # Errors
///
/// Returns [`ApiError`] when the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/available/{event_id}",
    tag = "Tickets",
    summary = "List available tickets",
    params(
        ("event_id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Available tickets", body = TicketListResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn available_tickets(
    State(state): State<AppState>,
    Path(event_id): Path<uuid::Uuid>,
    Requester(_requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = state
        .tickets
        .available_tickets(EventId::from_uuid(event_id))
        .await?;
    Ok(Json(TicketListResponse::from(tickets)))
}

/// `GET /tickets/event/:event_id` — List all tickets of an event.
///
/// # Errors
///
/// Returns [`ApiError`] unless the requester organizes the event or is an
/// admin.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/event/{event_id}",
    tag = "Tickets",
    summary = "List all tickets for an event",
    params(
        ("event_id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "All tickets of the event", body = TicketListResponse),
        (status = 401, description = "Not the organizer or an admin", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn event_tickets(
    State(state): State<AppState>,
    Path(event_id): Path<uuid::Uuid>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = state
        .tickets
        .event_tickets(EventId::from_uuid(event_id), &requester)
        .await?;
    Ok(Json(TicketListResponse::from(tickets)))
}

/// `POST /tickets/verify` — Verify a scanned payload at the door.
///
/// Read-only and replay-safe: scanning does not mark the ticket used.
///
/// # Errors
///
/// Returns [`ApiError`] when no ticket matches or the requester is not the
/// event's organizer or an admin.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/verify",
    tag = "Tickets",
    summary = "Verify a ticket QR payload",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification result", body = VerificationResponse),
        (status = 401, description = "Not the organizer or an admin", body = ErrorResponse),
        (status = 404, description = "No ticket matches the payload", body = ErrorResponse),
    )
)]
pub async fn verify_ticket(
    State(state): State<AppState>,
    Requester(requester): Requester,
    Json(req): Json<VerifyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.tickets.verify(&req.payload, &requester).await?;
    Ok(Json(VerificationResponse::from(report)))
}

/// `GET /tickets/scan/:payload` — Public scan view of a payload.
///
/// # Errors
///
/// Returns [`ApiError`] when no ticket matches or the ticket fails the
/// validity rule.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/scan/{payload}",
    tag = "Tickets",
    summary = "Scan a ticket QR payload (public)",
    params(
        ("payload" = String, Path, description = "Verification payload from the QR code"),
    ),
    responses(
        (status = 200, description = "Ticket details for display", body = ScanResponse),
        (status = 404, description = "No ticket matches the payload", body = ErrorResponse),
        (status = 422, description = "Ticket is not valid", body = ErrorResponse),
    )
)]
pub async fn scan_ticket(
    State(state): State<AppState>,
    Path(payload): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.tickets.scan(&payload).await?;
    Ok(Json(ScanResponse::from(report)))
}

/// `GET /tickets/qr/:ticket_id` — Render the requester's ticket QR code.
///
/// # Errors
///
/// Returns [`ApiError`] when the ticket is missing, the requester is not
/// its buyer, or no payload has been generated yet.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/qr/{ticket_id}",
    tag = "Tickets",
    summary = "Render a ticket's QR code",
    params(
        ("ticket_id" = uuid::Uuid, Path, description = "Ticket UUID"),
    ),
    responses(
        (status = 200, description = "QR code as a PNG data URL", body = QrCodeResponse),
        (status = 400, description = "No QR payload generated yet", body = ErrorResponse),
        (status = 401, description = "Requester is not the buyer", body = ErrorResponse),
        (status = 404, description = "Ticket not found", body = ErrorResponse),
    )
)]
pub async fn ticket_qr(
    State(state): State<AppState>,
    Path(ticket_id): Path<uuid::Uuid>,
    Requester(requester): Requester,
) -> Result<impl IntoResponse, ApiError> {
    let image = state
        .tickets
        .qr_image(TicketId::from_uuid(ticket_id), &requester)
        .await?;
    Ok(Json(QrCodeResponse::from(image)))
}

/// Ticket routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets/{event_id}", post(create_ticket))
        .route("/tickets/buy/{ticket_id}", post(buy_ticket))
        .route("/tickets/mine", get(my_tickets))
        .route("/tickets/available/{event_id}", get(available_tickets))
        .route("/tickets/event/{event_id}", get(event_tickets))
        .route("/tickets/verify", post(verify_ticket))
        .route("/tickets/scan/{payload}", get(scan_ticket))
        .route("/tickets/qr/{ticket_id}", get(ticket_qr))
}
