//! Notification dispatch for ticket confirmations.
//!
//! The allocation operation hands a completed sale's snapshot to a
//! [`TicketNotifier`] and ignores the outcome beyond logging. The notifier
//! is constructed once at process start and injected; there is no ambient
//! transport singleton.

pub mod smtp;

use std::future::Future;

use crate::domain::{Event, Ticket, User};

pub use smtp::SmtpNotifier;

/// Error raised by a notifier implementation.
///
/// Swallowed (after logging) at the allocation boundary; it must never
/// propagate into the allocation result.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The message could not be constructed.
    #[error("failed to build message: {0}")]
    Build(String),
    /// The transport rejected or failed to deliver the message.
    #[error("failed to send message: {0}")]
    Transport(String),
}

/// Immutable snapshot of a completed allocation, taken after the sold state
/// has been persisted.
#[derive(Debug, Clone)]
pub struct ConfirmationSnapshot {
    /// The sold ticket, populated with number and payload.
    pub ticket: Ticket,
    /// The owning event at sale time.
    pub event: Event,
    /// The buyer at sale time.
    pub buyer: User,
}

/// Delivery channel for ticket confirmations.
///
/// The returned future is `Send` so the send can run on a detached task.
pub trait TicketNotifier {
    /// Delivers a confirmation for a completed allocation.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] on build or transport failure; callers log
    /// and otherwise ignore it.
    fn send_ticket_confirmation(
        &self,
        snapshot: &ConfirmationSnapshot,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
