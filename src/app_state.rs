//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::notify::SmtpNotifier;
use crate::persistence::postgres::PgStore;
use crate::service::{AdminService, EventService, TicketService};

/// The ticket service as wired in the server binary.
pub type AppTicketService = TicketService<PgStore, SmtpNotifier>;
/// The event service as wired in the server binary.
pub type AppEventService = EventService<PgStore>;
/// The admin service as wired in the server binary.
pub type AppAdminService = AdminService<PgStore>;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Ticket allocation, verification, and listing logic.
    pub tickets: Arc<AppTicketService>,
    /// Event CRUD with the ticket cascade.
    pub events: Arc<AppEventService>,
    /// Administrative user removal and stats.
    pub admin: Arc<AppAdminService>,
    /// Record store, used directly by the requester extractor.
    pub store: PgStore,
}
