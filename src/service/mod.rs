//! Service layer: business logic orchestration.
//!
//! [`TicketService`] owns the allocation and verification flows,
//! [`EventService`] the event CRUD with its ticket cascade, and
//! [`AdminService`] user removal and platform stats. All of them are
//! generic over the record store interfaces in [`crate::persistence`].

pub mod admin_service;
pub mod event_service;
pub mod ticket_service;

pub use admin_service::{AdminService, UserCounts};
pub use event_service::EventService;
pub use ticket_service::{QrImage, ScanReport, TicketService, VerificationReport};
