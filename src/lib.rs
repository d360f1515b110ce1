//! # eventhub-gateway
//!
//! REST API for the EventHub event-ticketing platform.
//!
//! Organizers create events and tickets, attendees buy tickets, admins
//! manage users and events, and a QR-code-bearing confirmation is emailed
//! on purchase. The core flow is ticket allocation (binding a ticket to
//! exactly one buyer while generating its unique ticket number and QR
//! payload) and door-side verification of scanned payloads.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TicketService / EventService / AdminService (service/)
//!     ├── TicketNotifier (notify/) ── fire-and-forget SMTP
//!     │
//!     ├── Record Store traits (persistence/)
//!     │     ├── PgStore (PostgreSQL)
//!     │     └── MemoryStore (tests)
//!     │
//!     └── Domain model (domain/) + QR rendering (qr)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod qr;
pub mod service;
