//! Persistence layer: record store interfaces and their implementations.
//!
//! The services consume the [`TicketStore`], [`EventStore`], and
//! [`UserStore`] traits. [`postgres::PgStore`] is the production
//! implementation backed by `sqlx::PgPool`; [`memory::MemoryStore`] provides
//! the same semantics in process for tests. Uniqueness of ticket numbers is
//! enforced by the store itself in both implementations, so a race between
//! two generation attempts cannot produce duplicates undetected.
#![allow(async_fn_in_trait)]

pub mod memory;
pub mod models;
pub mod postgres;

use crate::domain::{Event, EventId, Role, Ticket, TicketId, TicketType, User, UserId};
use crate::error::ApiError;

pub use models::TicketCounts;

/// Outcome of the conditional mark-sold update.
///
/// `Unavailable` and `DuplicateNumber` are distinct so the allocation
/// operation can retry a number collision with a fresh candidate while
/// reporting a lost availability race as a conflict.
#[derive(Debug)]
pub enum MarkSoldOutcome {
    /// The ticket transitioned to sold; carries the populated ticket.
    Sold(Ticket),
    /// The ticket was no longer available (or already had a buyer).
    Unavailable,
    /// The candidate ticket number collided with a stored one.
    DuplicateNumber,
}

/// Store operations on tickets.
pub trait TicketStore {
    /// Persists a freshly created ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn create_ticket(&self, ticket: Ticket) -> Result<Ticket, ApiError>;

    /// Looks a ticket up by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn ticket_by_id(&self, id: TicketId) -> Result<Option<Ticket>, ApiError>;

    /// Looks a ticket up by exact verification payload match.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn ticket_by_payload(&self, payload: &str) -> Result<Option<Ticket>, ApiError>;

    /// Returns the tickets of an event, optionally restricted to available
    /// ones.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn tickets_by_event(
        &self,
        event_id: EventId,
        only_available: bool,
    ) -> Result<Vec<Ticket>, ApiError>;

    /// Returns all tickets bought by the given user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn tickets_by_buyer(&self, buyer_id: UserId) -> Result<Vec<Ticket>, ApiError>;

    /// Conditionally transitions a ticket from available to sold.
    ///
    /// The precondition ("still available and no buyer") is checked and
    /// enforced as a single indivisible operation against the persisted
    /// state; two concurrent calls on the same ticket yield exactly one
    /// [`MarkSoldOutcome::Sold`]. The number and payload are assigned only
    /// when none exist yet, so a repeated save never overwrites them.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn mark_sold(
        &self,
        id: TicketId,
        buyer_id: UserId,
        ticket_number: &str,
        payload: &str,
    ) -> Result<MarkSoldOutcome, ApiError>;

    /// Clears the buyer and restores availability (administrative un-sell).
    ///
    /// Also clears the ticket number and payload so a stale QR code cannot
    /// resolve to a resold ticket. Returns `false` when the ticket does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn revert_to_available(&self, id: TicketId) -> Result<bool, ApiError>;

    /// Deletes every ticket belonging to an event, returning the count.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn delete_tickets_for_event(&self, event_id: EventId) -> Result<u64, ApiError>;

    /// Returns platform-wide ticket counts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn ticket_counts(&self) -> Result<TicketCounts, ApiError>;
}

/// Store operations on events.
pub trait EventStore {
    /// Persists a new event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn create_event(&self, event: Event) -> Result<Event, ApiError>;

    /// Looks an event up by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn event_by_id(&self, id: EventId) -> Result<Option<Event>, ApiError>;

    /// Returns all events, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn list_events(&self) -> Result<Vec<Event>, ApiError>;

    /// Returns the events owned by an organizer.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn events_by_organizer(&self, organizer_id: UserId) -> Result<Vec<Event>, ApiError>;

    /// Deletes an event. Returns `false` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn delete_event(&self, id: EventId) -> Result<bool, ApiError>;
}

/// Store operations on users.
pub trait UserStore {
    /// Persists a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn create_user(&self, user: User) -> Result<User, ApiError>;

    /// Looks a user up by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, ApiError>;

    /// Deletes a user. Returns `false` when they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn delete_user(&self, id: UserId) -> Result<bool, ApiError>;

    /// Counts users holding the given role.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn count_users_by_role(&self, role: Role) -> Result<u64, ApiError>;
}

/// Convenience bound for the full record store consumed by the services.
pub trait RecordStore: TicketStore + EventStore + UserStore {}

impl<S: TicketStore + EventStore + UserStore> RecordStore for S {}

/// Parses a stored ticket type string, mapping unknown values to a
/// persistence error (the boundary rejects them on the way in, so a bad
/// stored value means corruption).
pub(crate) fn parse_stored_ticket_type(s: &str) -> Result<TicketType, ApiError> {
    TicketType::parse(s)
        .ok_or_else(|| ApiError::Persistence(format!("unknown stored ticket type: {s}")))
}
