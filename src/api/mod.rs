//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api/v1`, except the root-level
//! health check. With the `swagger-ui` feature enabled, interactive API
//! docs are served at `/docs`.

pub mod auth;
pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for every exposed endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "EventHub Gateway",
        description = "Event-ticketing REST API: events, ticket allocation, QR verification."
    ),
    paths(
        handlers::system::health_handler,
        handlers::event::create_event,
        handlers::event::list_events,
        handlers::event::get_event,
        handlers::ticket::create_ticket,
        handlers::ticket::buy_ticket,
        handlers::ticket::my_tickets,
        handlers::ticket::available_tickets,
        handlers::ticket::event_tickets,
        handlers::ticket::verify_ticket,
        handlers::ticket::scan_ticket,
        handlers::ticket::ticket_qr,
        handlers::admin::delete_event,
        handlers::admin::delete_attendee,
        handlers::admin::delete_organizer,
        handlers::admin::ticket_stats,
        handlers::admin::user_stats,
    ),
    tags(
        (name = "System", description = "Service health"),
        (name = "Events", description = "Event management"),
        (name = "Tickets", description = "Ticket allocation and verification"),
        (name = "Admin", description = "Administrative operations"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
