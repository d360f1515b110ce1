//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response,
//! so callers can distinguish "does not exist" from "not permitted" from
//! "already sold" from "exists but not currently valid".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{EventId, TicketId, UserId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2101,
///     "message": "ticket is not available",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ApiError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category                  | HTTP Status                |
/// |-----------|---------------------------|----------------------------|
/// | 1000–1999 | Validation                | 400 Bad Request            |
/// | 2000–2099 | Not Found                 | 404 Not Found              |
/// | 2100–2199 | Conflict (ticket state)   | 409 Conflict               |
/// | 2400–2499 | Authorization             | 401 Unauthorized           |
/// | 3000–3999 | Server                    | 500 Internal Server Error  |
/// | 4000–4999 | Ticket validity           | 422 Unprocessable Entity   |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed (missing field, negative price, unknown
    /// ticket type or category).
    #[error("invalid request: {0}")]
    Validation(String),

    /// Event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// Ticket with the given ID was not found.
    #[error("ticket not found: {0}")]
    TicketNotFound(TicketId),

    /// User with the given ID was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No ticket matches the scanned verification payload.
    #[error("invalid QR code - ticket not found")]
    PayloadNotFound,

    /// The ticket exists but is already sold or otherwise unavailable.
    #[error("ticket is not available")]
    TicketUnavailable(TicketId),

    /// Authenticated requester lacks the role or ownership for the
    /// operation.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// The payload resolves to a ticket that fails the validity rule
    /// (never sold, or reverted to availability).
    #[error("invalid ticket - not purchased or already used")]
    InvalidTicket,

    /// Ticket number generation kept colliding with stored numbers.
    #[error("ticket allocation failed after {attempts} attempts")]
    AllocationExhausted {
        /// Number of generation attempts made.
        attempts: u32,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::EventNotFound(_) => 2001,
            Self::TicketNotFound(_) => 2002,
            Self::UserNotFound(_) => 2003,
            Self::PayloadNotFound => 2004,
            Self::TicketUnavailable(_) => 2101,
            Self::Unauthorized(_) => 2401,
            Self::InvalidTicket => 4001,
            Self::AllocationExhausted { .. } => 3002,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_)
            | Self::TicketNotFound(_)
            | Self::UserNotFound(_)
            | Self::PayloadNotFound => StatusCode::NOT_FOUND,
            Self::TicketUnavailable(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidTicket => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AllocationExhausted { .. } | Self::Persistence(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_are_machine_distinguishable() {
        let outcomes = [
            ApiError::TicketNotFound(TicketId::new()),
            ApiError::TicketUnavailable(TicketId::new()),
            ApiError::Unauthorized("not your event".to_string()),
            ApiError::InvalidTicket,
        ];

        for (i, a) in outcomes.iter().enumerate() {
            for (j, b) in outcomes.iter().enumerate() {
                if i != j {
                    assert_ne!(a.error_code(), b.error_code());
                    assert_ne!(a.status_code(), b.status_code());
                }
            }
        }
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            ApiError::EventNotFound(EventId::new()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::PayloadNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::UserNotFound(UserId::new()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn payload_not_found_is_distinct_from_invalid_ticket() {
        assert_ne!(
            ApiError::PayloadNotFound.status_code(),
            ApiError::InvalidTicket.status_code()
        );
        assert_ne!(
            ApiError::PayloadNotFound.error_code(),
            ApiError::InvalidTicket.error_code()
        );
    }
}
