//! Admin service: user removal with ticket cleanup, and platform stats.

use crate::domain::{Role, User, UserId};
use crate::error::ApiError;
use crate::persistence::{RecordStore, TicketCounts};

/// User counts per role for the admin stats endpoint.
#[derive(Debug, Clone, Copy, serde::Serialize, utoipa::ToSchema)]
pub struct UserCounts {
    /// Registered organizers.
    pub organizers: u64,
    /// Registered attendees.
    pub attendees: u64,
}

/// Orchestration layer for administrative operations.
#[derive(Debug, Clone)]
pub struct AdminService<S> {
    store: S,
}

impl<S> AdminService<S>
where
    S: RecordStore + Clone + Send + Sync + 'static,
{
    /// Creates a new `AdminService`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn require_admin(requester: &User) -> Result<(), ApiError> {
        if requester.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(
                "admin role required".to_string(),
            ))
        }
    }

    /// Removes an attendee, reverting each of their tickets toward
    /// availability first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for non-admins,
    /// [`ApiError::UserNotFound`] when the user does not exist, and
    /// [`ApiError::Validation`] when the target is not an attendee.
    pub async fn remove_attendee(&self, id: UserId, requester: &User) -> Result<(), ApiError> {
        Self::require_admin(requester)?;

        let user = self
            .store
            .user_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound(id))?;
        if user.role != Role::Attendee {
            return Err(ApiError::Validation("user is not an attendee".to_string()));
        }

        let tickets = self.store.tickets_by_buyer(id).await?;
        let reverted = tickets.len();
        for ticket in tickets {
            self.store.revert_to_available(ticket.id).await?;
        }
        self.store.delete_user(id).await?;

        tracing::info!(user_id = %id, reverted, "attendee deleted, tickets made available");
        Ok(())
    }

    /// Removes an organizer together with their events and those events'
    /// tickets.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for non-admins,
    /// [`ApiError::UserNotFound`] when the user does not exist, and
    /// [`ApiError::Validation`] when the target is not an organizer.
    pub async fn remove_organizer(&self, id: UserId, requester: &User) -> Result<(), ApiError> {
        Self::require_admin(requester)?;

        let user = self
            .store
            .user_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound(id))?;
        if user.role != Role::Organizer {
            return Err(ApiError::Validation("user is not an organizer".to_string()));
        }

        let events = self.store.events_by_organizer(id).await?;
        let removed = events.len();
        for event in events {
            self.store.delete_tickets_for_event(event.id).await?;
            self.store.delete_event(event.id).await?;
        }
        self.store.delete_user(id).await?;

        tracing::info!(user_id = %id, events_removed = removed, "organizer deleted with events and tickets");
        Ok(())
    }

    /// Returns platform-wide ticket counts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for non-admins.
    pub async fn ticket_stats(&self, requester: &User) -> Result<TicketCounts, ApiError> {
        Self::require_admin(requester)?;
        self.store.ticket_counts().await
    }

    /// Returns user counts per role.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for non-admins.
    pub async fn user_stats(&self, requester: &User) -> Result<UserCounts, ApiError> {
        Self::require_admin(requester)?;
        Ok(UserCounts {
            organizers: self.store.count_users_by_role(Role::Organizer).await?,
            attendees: self.store.count_users_by_role(Role::Attendee).await?,
        })
    }
}
