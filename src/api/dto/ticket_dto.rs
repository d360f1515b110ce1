//! Ticket-related DTOs: creation, purchase, listings, verification, QR.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EventId, Ticket, TicketId, TicketType, UserId};
use crate::service::{QrImage, ScanReport, VerificationReport};

fn default_ticket_type() -> TicketType {
    TicketType::Regular
}

/// Request body for `POST /tickets/{event_id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTicketRequest {
    /// Ticket tier; defaults to `regular`.
    #[serde(default = "default_ticket_type")]
    pub ticket_type: TicketType,
    /// Sale price (non-negative).
    pub price: f64,
}

/// A ticket as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct TicketResponse {
    /// Ticket identifier.
    pub id: TicketId,
    /// Owning event.
    pub event_id: EventId,
    /// Ticket tier.
    pub ticket_type: TicketType,
    /// Sale price.
    pub price: f64,
    /// Buyer, absent while unsold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<UserId>,
    /// Availability flag.
    pub available: bool,
    /// Assigned ticket number, absent until first sale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    /// Assigned QR payload, absent until first sale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_payload: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            event_id: ticket.event_id,
            ticket_type: ticket.ticket_type,
            price: ticket.price,
            buyer_id: ticket.buyer_id,
            available: ticket.available,
            ticket_number: ticket.ticket_number,
            verification_payload: ticket.verification_payload,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

/// Ticket list response with a convenience count.
#[derive(Debug, Serialize, ToSchema)]
pub struct TicketListResponse {
    /// Number of tickets returned.
    pub count: usize,
    /// The tickets.
    pub data: Vec<TicketResponse>,
}

impl From<Vec<Ticket>> for TicketListResponse {
    fn from(tickets: Vec<Ticket>) -> Self {
        let data: Vec<TicketResponse> = tickets.into_iter().map(Into::into).collect();
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Request body for `POST /tickets/verify`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// The scanned verification payload.
    pub payload: String,
}

/// Response body for `POST /tickets/verify`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationResponse {
    /// Assigned ticket number, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    /// Ticket tier.
    pub ticket_type: TicketType,
    /// Owning event name.
    pub event_name: String,
    /// Buyer display name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_name: Option<String>,
    /// Buyer email, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_email: Option<String>,
    /// Computed validity flag.
    pub is_valid: bool,
}

impl From<VerificationReport> for VerificationResponse {
    fn from(report: VerificationReport) -> Self {
        Self {
            ticket_number: report.ticket_number,
            ticket_type: report.ticket_type,
            event_name: report.event_name,
            attendee_name: report.buyer_name,
            attendee_email: report.buyer_email,
            is_valid: report.is_valid,
        }
    }
}

/// Event details embedded in a scan response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanEventDto {
    /// Event name.
    pub name: String,
    /// Event description.
    pub description: String,
    /// Genre label.
    pub genre: String,
    /// Category.
    pub category: crate::domain::EventCategory,
    /// Base price.
    pub price: f64,
}

/// Buyer details embedded in a scan response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanAttendeeDto {
    /// Display name, when the buyer still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email, when the buyer still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Response body for `GET /tickets/scan/{payload}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    /// Assigned ticket number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    /// Ticket tier.
    pub ticket_type: TicketType,
    /// Price paid.
    pub price: f64,
    /// Purchase timestamp.
    pub purchase_date: DateTime<Utc>,
    /// Owning event details.
    pub event: ScanEventDto,
    /// Buyer details.
    pub attendee: ScanAttendeeDto,
    /// Display status label.
    pub status: String,
}

impl From<ScanReport> for ScanResponse {
    fn from(report: ScanReport) -> Self {
        Self {
            ticket_number: report.ticket_number,
            ticket_type: report.ticket_type,
            price: report.price,
            purchase_date: report.purchase_date,
            event: ScanEventDto {
                name: report.event.name,
                description: report.event.description,
                genre: report.event.genre,
                category: report.event.category,
                price: report.event.price,
            },
            attendee: ScanAttendeeDto {
                name: report.buyer_name,
                email: report.buyer_email,
            },
            status: report.status.to_string(),
        }
    }
}

/// Response body for `GET /tickets/qr/{ticket_id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct QrCodeResponse {
    /// The QR PNG as a `data:image/png;base64,` URL.
    pub qr_code_data_url: String,
    /// The ticket's assigned number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
}

impl From<QrImage> for QrCodeResponse {
    fn from(image: QrImage) -> Self {
        Self {
            qr_code_data_url: image.data_url,
            ticket_number: image.ticket_number,
        }
    }
}
