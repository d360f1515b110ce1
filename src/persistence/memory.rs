//! In-memory implementation of the record store.
//!
//! [`MemoryStore`] keeps all records in a `tokio::sync::RwLock`-protected
//! map set and reproduces the conditional-update atomicity of the SQL
//! store under a single write guard, so the allocation race properties can
//! be exercised in process. Used by the test suites; not wired into the
//! server binary.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::models::TicketCounts;
use super::{EventStore, MarkSoldOutcome, TicketStore, UserStore};
use crate::domain::{Event, EventId, Role, Ticket, TicketId, User, UserId};
use crate::error::ApiError;

#[derive(Debug, Default)]
struct Inner {
    tickets: HashMap<TicketId, Ticket>,
    events: HashMap<EventId, Event>,
    users: HashMap<UserId, User>,
    // Owned uniqueness index over assigned ticket numbers.
    numbers: HashSet<String>,
}

/// In-memory record store with the same observable semantics as
/// [`super::postgres::PgStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TicketStore for MemoryStore {
    async fn create_ticket(&self, ticket: Ticket) -> Result<Ticket, ApiError> {
        let mut inner = self.inner.write().await;
        inner.tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn ticket_by_id(&self, id: TicketId) -> Result<Option<Ticket>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.tickets.get(&id).cloned())
    }

    async fn ticket_by_payload(&self, payload: &str) -> Result<Option<Ticket>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tickets
            .values()
            .find(|t| t.verification_payload.as_deref() == Some(payload))
            .cloned())
    }

    async fn tickets_by_event(
        &self,
        event_id: EventId,
        only_available: bool,
    ) -> Result<Vec<Ticket>, ApiError> {
        let inner = self.inner.read().await;
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .values()
            .filter(|t| t.event_id == event_id && (!only_available || t.available))
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.created_at);
        Ok(tickets)
    }

    async fn tickets_by_buyer(&self, buyer_id: UserId) -> Result<Vec<Ticket>, ApiError> {
        let inner = self.inner.read().await;
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .values()
            .filter(|t| t.buyer_id == Some(buyer_id))
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.created_at);
        Ok(tickets)
    }

    async fn mark_sold(
        &self,
        id: TicketId,
        buyer_id: UserId,
        ticket_number: &str,
        payload: &str,
    ) -> Result<MarkSoldOutcome, ApiError> {
        // The whole precondition-check-and-mutate runs under one write
        // guard, matching the single-statement UPDATE of the SQL store.
        let mut inner = self.inner.write().await;

        let Some(ticket) = inner.tickets.get(&id) else {
            return Ok(MarkSoldOutcome::Unavailable);
        };
        if !ticket.available || ticket.buyer_id.is_some() {
            return Ok(MarkSoldOutcome::Unavailable);
        }

        // Assign the number/payload only when none exist yet.
        let needs_number = ticket.ticket_number.is_none();
        if needs_number {
            if inner.numbers.contains(ticket_number) {
                return Ok(MarkSoldOutcome::DuplicateNumber);
            }
            inner.numbers.insert(ticket_number.to_string());
        }

        let Some(ticket) = inner.tickets.get_mut(&id) else {
            return Ok(MarkSoldOutcome::Unavailable);
        };
        ticket.buyer_id = Some(buyer_id);
        ticket.available = false;
        if needs_number {
            ticket.ticket_number = Some(ticket_number.to_string());
            ticket.verification_payload = Some(payload.to_string());
        }
        ticket.updated_at = Utc::now();

        Ok(MarkSoldOutcome::Sold(ticket.clone()))
    }

    async fn revert_to_available(&self, id: TicketId) -> Result<bool, ApiError> {
        let mut inner = self.inner.write().await;
        let number = match inner.tickets.get_mut(&id) {
            Some(ticket) => {
                let number = ticket.ticket_number.take();
                ticket.buyer_id = None;
                ticket.available = true;
                ticket.verification_payload = None;
                ticket.updated_at = Utc::now();
                number
            }
            None => return Ok(false),
        };
        if let Some(number) = number {
            inner.numbers.remove(&number);
        }
        Ok(true)
    }

    async fn delete_tickets_for_event(&self, event_id: EventId) -> Result<u64, ApiError> {
        let mut inner = self.inner.write().await;
        let doomed: Vec<TicketId> = inner
            .tickets
            .values()
            .filter(|t| t.event_id == event_id)
            .map(|t| t.id)
            .collect();
        for id in &doomed {
            if let Some(ticket) = inner.tickets.remove(id)
                && let Some(number) = ticket.ticket_number
            {
                inner.numbers.remove(&number);
            }
        }
        Ok(doomed.len() as u64)
    }

    async fn ticket_counts(&self) -> Result<TicketCounts, ApiError> {
        let inner = self.inner.read().await;
        let total = inner.tickets.len() as u64;
        let sold = inner.tickets.values().filter(|t| !t.available).count() as u64;
        Ok(TicketCounts {
            total,
            sold,
            available: total.saturating_sub(sold),
        })
    }
}

impl EventStore for MemoryStore {
    async fn create_event(&self, event: Event) -> Result<Event, ApiError> {
        let mut inner = self.inner.write().await;
        inner.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn event_by_id(&self, id: EventId) -> Result<Option<Event>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.events.get(&id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner.events.values().cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn events_by_organizer(&self, organizer_id: UserId) -> Result<Vec<Event>, ApiError> {
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, ApiError> {
        let mut inner = self.inner.write().await;
        Ok(inner.events.remove(&id).is_some())
    }
}

impl UserStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User, ApiError> {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, ApiError> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.remove(&id).is_some())
    }

    async fn count_users_by_role(&self, role: Role) -> Result<u64, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().filter(|u| u.role == role).count() as u64)
    }
}
