//! Ticket entity and ticket type classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, TicketId, UserId};

/// Closed set of ticket tiers an organizer can put on sale.
///
/// Unknown strings are rejected at the boundary by [`TicketType::parse`]
/// rather than stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TicketType {
    /// Standard admission.
    Regular,
    /// VIP admission.
    Vip,
    /// Premium admission.
    Premium,
    /// Discounted early-bird admission.
    EarlyBird,
}

impl TicketType {
    /// Returns the wire/storage form of the ticket type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Vip => "vip",
            Self::Premium => "premium",
            Self::EarlyBird => "early-bird",
        }
    }

    /// Parses a stored or submitted ticket type string.
    ///
    /// Returns `None` for anything outside the closed set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Self::Regular),
            "vip" => Some(Self::Vip),
            "premium" => Some(Self::Premium),
            "early-bird" => Some(Self::EarlyBird),
            _ => None,
        }
    }
}

impl std::fmt::Display for TicketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single admission ticket for an event.
///
/// Created by an organizer in the available state with no buyer, no number,
/// and no payload. Exactly one successful allocation transitions it to the
/// sold state, assigning `buyer_id`, flipping `available`, and generating
/// `ticket_number` / `verification_payload` as one unit.
///
/// # Invariant
///
/// `available == buyer_id.is_none()` holds at every observable point; the
/// store enforces it with a CHECK constraint and the conditional update
/// mutates both fields together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket identifier (immutable after creation).
    pub id: TicketId,

    /// Owning event (required, immutable).
    pub event_id: EventId,

    /// Ticket tier.
    pub ticket_type: TicketType,

    /// Sale price. Non-negative.
    pub price: f64,

    /// Buyer, or `None` while the ticket is unsold.
    pub buyer_id: Option<UserId>,

    /// `true` iff `buyer_id` is `None`.
    pub available: bool,

    /// Unique human-readable code, assigned exactly once at first sale.
    pub ticket_number: Option<String>,

    /// QR payload encoding (ticket number, event, buyer); assigned
    /// atomically with `ticket_number`.
    pub verification_payload: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last state mutation.
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Creates a fresh, unsold ticket for the given event.
    #[must_use]
    pub fn new(event_id: EventId, ticket_type: TicketType, price: f64) -> Self {
        let now = Utc::now();
        Self {
            id: TicketId::new(),
            event_id,
            ticket_type,
            price,
            buyer_id: None,
            available: true,
            ticket_number: None,
            verification_payload: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Scan-time validity rule: sold and bound to a buyer.
    #[must_use]
    pub fn is_valid_for_entry(&self) -> bool {
        !self.available && self.buyer_id.is_some()
    }

    /// Returns `true` when the availability flag agrees with the buyer field.
    #[must_use]
    pub fn state_consistent(&self) -> bool {
        self.available == self.buyer_id.is_none()
    }
}
