//! Event-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Event, EventCategory, EventId, UserId};

/// Request body for `POST /events`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Event name (max 100 characters).
    pub name: String,
    /// Event description (max 1000 characters).
    pub description: String,
    /// Genre label (max 50 characters).
    pub genre: String,
    /// Category from the closed set.
    pub category: EventCategory,
    /// Base price (non-negative).
    pub price: f64,
}

/// An event as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    /// Event identifier.
    pub id: EventId,
    /// Event name.
    pub name: String,
    /// Event description.
    pub description: String,
    /// Genre label.
    pub genre: String,
    /// Category.
    pub category: EventCategory,
    /// Base price.
    pub price: f64,
    /// Owning organizer.
    pub organizer_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            genre: event.genre,
            category: event.category,
            price: event.price,
            organizer_id: event.organizer_id,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Event list response with a convenience count.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Number of events returned.
    pub count: usize,
    /// The events.
    pub data: Vec<EventResponse>,
}

impl From<Vec<Event>> for EventListResponse {
    fn from(events: Vec<Event>) -> Self {
        let data: Vec<EventResponse> = events.into_iter().map(Into::into).collect();
        Self {
            count: data.len(),
            data,
        }
    }
}
