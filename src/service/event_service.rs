//! Event service: event CRUD and the cascading delete.

use crate::domain::{Event, EventCategory, EventId, Role, User};
use crate::error::ApiError;
use crate::persistence::RecordStore;

/// Orchestration layer for event operations.
#[derive(Debug, Clone)]
pub struct EventService<S> {
    store: S,
}

impl<S> EventService<S>
where
    S: RecordStore + Clone + Send + Sync + 'static,
{
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an event owned by the requester.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] unless the requester is an
    /// organizer and [`ApiError::Validation`] when a field limit is
    /// violated.
    pub async fn create_event(
        &self,
        requester: &User,
        name: String,
        description: String,
        genre: String,
        category: EventCategory,
        price: f64,
    ) -> Result<Event, ApiError> {
        if requester.role != Role::Organizer {
            return Err(ApiError::Unauthorized(
                "only organizers can create events".to_string(),
            ));
        }

        let event = Event::new(name, description, genre, category, price, requester.id)
            .map_err(ApiError::Validation)?;
        let event = self.store.create_event(event).await?;

        tracing::info!(event_id = %event.id, organizer_id = %requester.id, "event created");
        Ok(event)
    }

    /// Looks an event up by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::EventNotFound`] when it does not exist.
    pub async fn get_event(&self, id: EventId) -> Result<Event, ApiError> {
        self.store
            .event_by_id(id)
            .await?
            .ok_or(ApiError::EventNotFound(id))
    }

    /// Returns all events, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.store.list_events().await
    }

    /// Deletes an event and every ticket that references it (admin only).
    ///
    /// Tickets are removed first so no orphaned ticket remains observable.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for non-admins and
    /// [`ApiError::EventNotFound`] when the event does not exist.
    pub async fn delete_event(&self, id: EventId, requester: &User) -> Result<(), ApiError> {
        if requester.role != Role::Admin {
            return Err(ApiError::Unauthorized(
                "only admins can delete events".to_string(),
            ));
        }

        self.store
            .event_by_id(id)
            .await?
            .ok_or(ApiError::EventNotFound(id))?;

        let tickets_deleted = self.store.delete_tickets_for_event(id).await?;
        self.store.delete_event(id).await?;

        tracing::info!(event_id = %id, tickets_deleted, "event and associated tickets deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Ticket, TicketType};
    use crate::persistence::memory::MemoryStore;
    use crate::persistence::{TicketStore, UserStore};

    async fn seed_user(store: &MemoryStore, role: Role) -> User {
        let user = User::new("Test".to_string(), "test@example.com".to_string(), role);
        let Ok(user) = store.create_user(user).await else {
            panic!("user insert failed");
        };
        user
    }

    fn service() -> (EventService<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (EventService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn create_event_requires_organizer_role() {
        let (service, store) = service();
        let attendee = seed_user(&store, Role::Attendee).await;

        let result = service
            .create_event(
                &attendee,
                "Summer Fest".to_string(),
                "Open-air festival".to_string(),
                "rock".to_string(),
                EventCategory::Music,
                50.0,
            )
            .await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn create_event_validates_fields() {
        let (service, store) = service();
        let organizer = seed_user(&store, Role::Organizer).await;

        let result = service
            .create_event(
                &organizer,
                String::new(),
                "Open-air festival".to_string(),
                "rock".to_string(),
                EventCategory::Music,
                50.0,
            )
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let result = service
            .create_event(
                &organizer,
                "Summer Fest".to_string(),
                "Open-air festival".to_string(),
                "rock".to_string(),
                EventCategory::Music,
                -5.0,
            )
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_event_cascades_to_tickets() {
        let (service, store) = service();
        let organizer = seed_user(&store, Role::Organizer).await;
        let admin = seed_user(&store, Role::Admin).await;

        let event = service
            .create_event(
                &organizer,
                "Summer Fest".to_string(),
                "Open-air festival".to_string(),
                "rock".to_string(),
                EventCategory::Music,
                50.0,
            )
            .await;
        let Ok(event) = event else {
            panic!("event creation failed");
        };
        for _ in 0..3 {
            let inserted = store
                .create_ticket(Ticket::new(event.id, TicketType::Regular, 50.0))
                .await;
            assert!(inserted.is_ok());
        }

        let denied = service.delete_event(event.id, &organizer).await;
        assert!(matches!(denied, Err(ApiError::Unauthorized(_))));

        let deleted = service.delete_event(event.id, &admin).await;
        assert!(deleted.is_ok());

        let remaining = store.tickets_by_event(event.id, false).await;
        assert_eq!(remaining.ok().map(|v| v.len()), Some(0));
        let gone = service.get_event(event.id).await;
        assert!(matches!(gone, Err(ApiError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn delete_missing_event_is_not_found() {
        let (service, store) = service();
        let admin = seed_user(&store, Role::Admin).await;
        let result = service.delete_event(EventId::new(), &admin).await;
        assert!(matches!(result, Err(ApiError::EventNotFound(_))));
    }
}
