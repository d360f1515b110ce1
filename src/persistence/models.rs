//! Database row types and their conversions into domain entities.
//!
//! Rows mirror the table layout with primitive column types; enum-like
//! columns are stored as text and parsed on the way out.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::parse_stored_ticket_type;
use crate::domain::{Event, EventCategory, Role, Ticket, User};
use crate::error::ApiError;

/// A ticket row from the `tickets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketRow {
    /// Primary key.
    pub id: Uuid,
    /// Owning event.
    pub event_id: Uuid,
    /// Ticket tier as stored text.
    pub ticket_type: String,
    /// Sale price.
    pub price: f64,
    /// Buyer, NULL while unsold.
    pub buyer_id: Option<Uuid>,
    /// Availability flag.
    pub available: bool,
    /// Assigned ticket number, NULL until first sale.
    pub ticket_number: Option<String>,
    /// Assigned QR payload, NULL until first sale.
    pub verification_payload: Option<String>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = ApiError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            event_id: row.event_id.into(),
            ticket_type: parse_stored_ticket_type(&row.ticket_type)?,
            price: row.price,
            buyer_id: row.buyer_id.map(Into::into),
            available: row.available,
            ticket_number: row.ticket_number,
            verification_payload: row.verification_payload,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// An event row from the `events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Primary key.
    pub id: Uuid,
    /// Event name.
    pub name: String,
    /// Event description.
    pub description: String,
    /// Genre label.
    pub genre: String,
    /// Category as stored text.
    pub category: String,
    /// Base price.
    pub price: f64,
    /// Owning organizer.
    pub organizer_id: Uuid,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = ApiError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let category = EventCategory::parse(&row.category).ok_or_else(|| {
            ApiError::Persistence(format!("unknown stored category: {}", row.category))
        })?;
        Ok(Self {
            id: row.id.into(),
            name: row.name,
            description: row.description,
            genre: row.genre,
            category,
            price: row.price,
            organizer_id: row.organizer_id.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A user row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// Primary key.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Role as stored text.
    pub role: String,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = ApiError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| ApiError::Persistence(format!("unknown stored role: {}", row.role)))?;
        Ok(Self {
            id: row.id.into(),
            name: row.name,
            email: row.email,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Platform-wide ticket counts for the admin stats endpoint.
#[derive(Debug, Clone, Copy, Serialize, utoipa::ToSchema)]
pub struct TicketCounts {
    /// All tickets ever created and not yet deleted.
    pub total: u64,
    /// Tickets currently bound to a buyer.
    pub sold: u64,
    /// Tickets currently available.
    pub available: u64,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_ticket_row() -> TicketRow {
        let now = Utc::now();
        TicketRow {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            ticket_type: "early-bird".to_string(),
            price: 35.0,
            buyer_id: None,
            available: true,
            ticket_number: None,
            verification_payload: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn ticket_row_converts_to_domain() {
        let row = make_ticket_row();
        let Ok(ticket) = Ticket::try_from(row) else {
            panic!("conversion failed");
        };
        assert_eq!(ticket.ticket_type, crate::domain::TicketType::EarlyBird);
        assert!(ticket.state_consistent());
    }

    #[test]
    fn ticket_row_rejects_unknown_type() {
        let mut row = make_ticket_row();
        row.ticket_type = "backstage".to_string();
        assert!(Ticket::try_from(row).is_err());
    }

    #[test]
    fn user_row_rejects_unknown_role() {
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: "root".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(User::try_from(row).is_err());
    }
}
