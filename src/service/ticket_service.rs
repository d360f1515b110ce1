//! Ticket service: allocation, verification, listings, and QR rendering.

use crate::domain::{
    Event, EventId, Role, Ticket, TicketId, TicketType, User, generate_ticket_number,
    verification_payload,
};
use crate::error::ApiError;
use crate::notify::{ConfirmationSnapshot, TicketNotifier};
use crate::persistence::{MarkSoldOutcome, RecordStore};
use crate::qr;

/// Maximum ticket-number generation attempts before an allocation fails.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

/// Read-only result of an authenticated door-side verification.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    /// Assigned ticket number, if any.
    pub ticket_number: Option<String>,
    /// Ticket tier.
    pub ticket_type: TicketType,
    /// Name of the owning event.
    pub event_name: String,
    /// Buyer display name, when a buyer is bound and still exists.
    pub buyer_name: Option<String>,
    /// Buyer email, when a buyer is bound and still exists.
    pub buyer_email: Option<String>,
    /// Computed validity: sold and bound to a buyer.
    pub is_valid: bool,
}

/// Read-only public projection returned by the scan endpoint.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Assigned ticket number.
    pub ticket_number: Option<String>,
    /// Ticket tier.
    pub ticket_type: TicketType,
    /// Price paid.
    pub price: f64,
    /// Purchase timestamp.
    pub purchase_date: chrono::DateTime<chrono::Utc>,
    /// Owning event snapshot.
    pub event: Event,
    /// Buyer display name, when the buyer still exists.
    pub buyer_name: Option<String>,
    /// Buyer email, when the buyer still exists.
    pub buyer_email: Option<String>,
    /// Display status label.
    pub status: &'static str,
}

/// Rendered QR image for a ticket.
#[derive(Debug, Clone)]
pub struct QrImage {
    /// PNG as a `data:image/png;base64,` URL.
    pub data_url: String,
    /// The ticket's assigned number.
    pub ticket_number: Option<String>,
}

/// Orchestration layer for all ticket operations.
///
/// Holds the record store and the injected notification dispatch. The
/// allocation method follows the pattern: check preconditions → one
/// conditional store update → detach the confirmation send → return the
/// populated ticket.
#[derive(Debug, Clone)]
pub struct TicketService<S, N> {
    store: S,
    notifier: N,
}

impl<S, N> TicketService<S, N>
where
    S: RecordStore + Clone + Send + Sync + 'static,
    N: TicketNotifier + Clone + Send + Sync + 'static,
{
    /// Creates a new `TicketService`.
    #[must_use]
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Returns a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an available ticket for an event the requester owns.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on a negative price,
    /// [`ApiError::EventNotFound`] when the event does not exist, and
    /// [`ApiError::Unauthorized`] when the requester does not own it.
    pub async fn create_ticket(
        &self,
        event_id: EventId,
        requester: &User,
        ticket_type: TicketType,
        price: f64,
    ) -> Result<Ticket, ApiError> {
        if price < 0.0 {
            return Err(ApiError::Validation("price cannot be negative".to_string()));
        }

        let event = self
            .store
            .event_by_id(event_id)
            .await?
            .ok_or(ApiError::EventNotFound(event_id))?;

        if event.organizer_id != requester.id {
            return Err(ApiError::Unauthorized(
                "not authorized to create tickets for this event".to_string(),
            ));
        }

        let ticket = self
            .store
            .create_ticket(Ticket::new(event_id, ticket_type, price))
            .await?;

        tracing::info!(ticket_id = %ticket.id, event_id = %event_id, "ticket created");
        Ok(ticket)
    }

    /// Allocates a ticket to the requester ("buy ticket").
    ///
    /// Preconditions in order: the ticket exists, and it is available with
    /// no buyer. The state transition is a single conditional update in the
    /// store, so two concurrent calls yield exactly one success. On success
    /// the confirmation is dispatched on a detached task and the populated
    /// ticket is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TicketNotFound`], [`ApiError::TicketUnavailable`]
    /// when the ticket is sold (or loses the race), and
    /// [`ApiError::AllocationExhausted`] when number generation keeps
    /// colliding.
    pub async fn buy_ticket(&self, ticket_id: TicketId, requester: &User) -> Result<Ticket, ApiError> {
        let existing = self
            .store
            .ticket_by_id(ticket_id)
            .await?
            .ok_or(ApiError::TicketNotFound(ticket_id))?;

        if !existing.available || existing.buyer_id.is_some() {
            return Err(ApiError::TicketUnavailable(ticket_id));
        }

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let number = generate_ticket_number();
            let payload = verification_payload(&number, existing.event_id, requester.id);

            match self
                .store
                .mark_sold(ticket_id, requester.id, &number, &payload)
                .await?
            {
                MarkSoldOutcome::Sold(ticket) => {
                    tracing::info!(
                        ticket_id = %ticket.id,
                        buyer_id = %requester.id,
                        ticket_number = ticket.ticket_number.as_deref().unwrap_or("-"),
                        "ticket sold"
                    );
                    self.dispatch_confirmation(&ticket, requester).await;
                    return Ok(ticket);
                }
                MarkSoldOutcome::Unavailable => {
                    return Err(ApiError::TicketUnavailable(ticket_id));
                }
                MarkSoldOutcome::DuplicateNumber => {
                    tracing::warn!(
                        ticket_id = %ticket_id,
                        attempt,
                        "ticket number collision, regenerating"
                    );
                }
            }
        }

        Err(ApiError::AllocationExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// Hands the sale snapshot to the notifier on a detached task.
    ///
    /// Runs only after the sold state has been persisted. Failures are
    /// logged and never reach the allocation result.
    async fn dispatch_confirmation(&self, ticket: &Ticket, buyer: &User) {
        let event = match self.store.event_by_id(ticket.event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                tracing::warn!(
                    ticket_id = %ticket.id,
                    "owning event missing, skipping confirmation"
                );
                return;
            }
            Err(e) => {
                tracing::warn!(
                    ticket_id = %ticket.id,
                    error = %e,
                    "event lookup failed, skipping confirmation"
                );
                return;
            }
        };

        let notifier = self.notifier.clone();
        let snapshot = ConfirmationSnapshot {
            ticket: ticket.clone(),
            event,
            buyer: buyer.clone(),
        };
        tokio::spawn(async move {
            if let Err(e) = notifier.send_ticket_confirmation(&snapshot).await {
                tracing::warn!(
                    ticket_id = %snapshot.ticket.id,
                    error = %e,
                    "failed to send ticket confirmation"
                );
            }
        });
    }

    /// Returns the available tickets of an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::EventNotFound`] when the event does not exist.
    pub async fn available_tickets(&self, event_id: EventId) -> Result<Vec<Ticket>, ApiError> {
        self.store
            .event_by_id(event_id)
            .await?
            .ok_or(ApiError::EventNotFound(event_id))?;

        self.store.tickets_by_event(event_id, true).await
    }

    /// Returns every ticket bought by the requester.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    pub async fn my_tickets(&self, requester: &User) -> Result<Vec<Ticket>, ApiError> {
        self.store.tickets_by_buyer(requester.id).await
    }

    /// Returns all tickets of an event for its organizer or an admin.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::EventNotFound`] when the event does not exist
    /// and [`ApiError::Unauthorized`] for other requesters.
    pub async fn event_tickets(
        &self,
        event_id: EventId,
        requester: &User,
    ) -> Result<Vec<Ticket>, ApiError> {
        let event = self
            .store
            .event_by_id(event_id)
            .await?
            .ok_or(ApiError::EventNotFound(event_id))?;

        if event.organizer_id != requester.id && requester.role != Role::Admin {
            return Err(ApiError::Unauthorized(
                "not authorized to view tickets for this event".to_string(),
            ));
        }

        self.store.tickets_by_event(event_id, false).await
    }

    /// Authenticated door-side verification of a scanned payload.
    ///
    /// Read-only and repeatable; scanning never marks a ticket used.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on an empty payload,
    /// [`ApiError::PayloadNotFound`] when nothing matches, and
    /// [`ApiError::Unauthorized`] unless the requester is the event's
    /// organizer or an admin.
    pub async fn verify(
        &self,
        payload: &str,
        requester: &User,
    ) -> Result<VerificationReport, ApiError> {
        if payload.is_empty() {
            return Err(ApiError::Validation("QR code is required".to_string()));
        }

        let ticket = self
            .store
            .ticket_by_payload(payload)
            .await?
            .ok_or(ApiError::PayloadNotFound)?;

        let event = self
            .store
            .event_by_id(ticket.event_id)
            .await?
            .ok_or_else(|| ApiError::Internal("ticket references missing event".to_string()))?;

        if event.organizer_id != requester.id && requester.role != Role::Admin {
            return Err(ApiError::Unauthorized(
                "not authorized to verify this ticket".to_string(),
            ));
        }

        let buyer = match ticket.buyer_id {
            Some(buyer_id) => self.store.user_by_id(buyer_id).await?,
            None => None,
        };

        Ok(VerificationReport {
            ticket_number: ticket.ticket_number.clone(),
            ticket_type: ticket.ticket_type,
            event_name: event.name,
            buyer_name: buyer.as_ref().map(|u| u.name.clone()),
            buyer_email: buyer.map(|u| u.email),
            is_valid: ticket.is_valid_for_entry(),
        })
    }

    /// Public, unauthenticated scan view of a payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on an empty payload,
    /// [`ApiError::PayloadNotFound`] when nothing matches, and
    /// [`ApiError::InvalidTicket`] when the resolved ticket fails the
    /// validity rule.
    pub async fn scan(&self, payload: &str) -> Result<ScanReport, ApiError> {
        if payload.is_empty() {
            return Err(ApiError::Validation("QR code is required".to_string()));
        }

        let ticket = self
            .store
            .ticket_by_payload(payload)
            .await?
            .ok_or(ApiError::PayloadNotFound)?;

        if !ticket.is_valid_for_entry() {
            return Err(ApiError::InvalidTicket);
        }

        let event = self
            .store
            .event_by_id(ticket.event_id)
            .await?
            .ok_or_else(|| ApiError::Internal("ticket references missing event".to_string()))?;

        let buyer = match ticket.buyer_id {
            Some(buyer_id) => self.store.user_by_id(buyer_id).await?,
            None => None,
        };

        Ok(ScanReport {
            ticket_number: ticket.ticket_number.clone(),
            ticket_type: ticket.ticket_type,
            price: ticket.price,
            purchase_date: ticket.updated_at,
            event,
            buyer_name: buyer.as_ref().map(|u| u.name.clone()),
            buyer_email: buyer.map(|u| u.email),
            status: "Valid",
        })
    }

    /// Renders the requester's ticket QR code as a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::TicketNotFound`] when the ticket does not exist,
    /// [`ApiError::Unauthorized`] unless the requester is the buyer, and
    /// [`ApiError::Validation`] when no payload has been generated yet.
    pub async fn qr_image(
        &self,
        ticket_id: TicketId,
        requester: &User,
    ) -> Result<QrImage, ApiError> {
        let ticket = self
            .store
            .ticket_by_id(ticket_id)
            .await?
            .ok_or(ApiError::TicketNotFound(ticket_id))?;

        if ticket.buyer_id != Some(requester.id) {
            return Err(ApiError::Unauthorized(
                "not authorized to view this ticket's QR code".to_string(),
            ));
        }

        let Some(payload) = ticket.verification_payload.as_deref() else {
            return Err(ApiError::Validation(
                "QR code not available for this ticket".to_string(),
            ));
        };

        let data_url = qr::render_data_url(payload, qr::DEFAULT_QR_SIZE)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(QrImage {
            data_url,
            ticket_number: ticket.ticket_number,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{EventCategory, UserId};
    use crate::notify::NotifyError;
    use crate::persistence::memory::MemoryStore;
    use crate::persistence::{EventStore, TicketStore, UserStore};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Notifier double that forwards every snapshot to a channel.
    #[derive(Debug, Clone)]
    struct RecordingNotifier {
        sent: mpsc::UnboundedSender<ConfirmationSnapshot>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new(fail: bool) -> (Self, mpsc::UnboundedReceiver<ConfirmationSnapshot>) {
            let (sent, rx) = mpsc::unbounded_channel();
            (Self { sent, fail }, rx)
        }
    }

    impl TicketNotifier for RecordingNotifier {
        async fn send_ticket_confirmation(
            &self,
            snapshot: &ConfirmationSnapshot,
        ) -> Result<(), NotifyError> {
            let _ = self.sent.send(snapshot.clone());
            if self.fail {
                return Err(NotifyError::Transport("smtp down".to_string()));
            }
            Ok(())
        }
    }

    struct Fixture {
        service: TicketService<MemoryStore, RecordingNotifier>,
        sent: mpsc::UnboundedReceiver<ConfirmationSnapshot>,
        organizer: User,
        attendee: User,
        admin: User,
        event: Event,
    }

    async fn fixture() -> Fixture {
        fixture_with(false).await
    }

    async fn fixture_with(failing_notifier: bool) -> Fixture {
        let store = MemoryStore::new();
        let (notifier, sent) = RecordingNotifier::new(failing_notifier);
        let service = TicketService::new(store.clone(), notifier);

        let organizer = seed_user(&store, "Olive", Role::Organizer).await;
        let attendee = seed_user(&store, "Ada", Role::Attendee).await;
        let admin = seed_user(&store, "Root", Role::Admin).await;

        let event = match Event::new(
            "Summer Fest".to_string(),
            "Open-air festival".to_string(),
            "rock".to_string(),
            EventCategory::Music,
            50.0,
            organizer.id,
        ) {
            Ok(event) => event,
            Err(e) => panic!("event creation failed: {e}"),
        };
        let Ok(event) = store.create_event(event).await else {
            panic!("event insert failed");
        };

        Fixture {
            service,
            sent,
            organizer,
            attendee,
            admin,
            event,
        }
    }

    async fn seed_user(store: &MemoryStore, name: &str, role: Role) -> User {
        let user = User::new(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            role,
        );
        let Ok(user) = store.create_user(user).await else {
            panic!("user insert failed");
        };
        user
    }

    async fn seed_ticket(fx: &Fixture) -> Ticket {
        let ticket = fx
            .service
            .create_ticket(fx.event.id, &fx.organizer, TicketType::Regular, 50.0)
            .await;
        let Ok(ticket) = ticket else {
            panic!("ticket creation failed");
        };
        ticket
    }

    fn assert_number_format(number: &str) {
        let mut parts = number.splitn(3, '-');
        assert_eq!(parts.next(), Some("TKT"));
        assert!(parts.next().is_some_and(|p| p.parse::<i64>().is_ok()));
        assert!(parts.next().is_some_and(|p| {
            p.len() == 5 && p.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        }));
    }

    #[tokio::test]
    async fn create_ticket_requires_event_ownership() {
        let fx = fixture().await;
        let result = fx
            .service
            .create_ticket(fx.event.id, &fx.attendee, TicketType::Regular, 50.0)
            .await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));

        // Admins do not own the event either.
        let result = fx
            .service
            .create_ticket(fx.event.id, &fx.admin, TicketType::Regular, 50.0)
            .await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn create_ticket_rejects_negative_price() {
        let fx = fixture().await;
        let result = fx
            .service
            .create_ticket(fx.event.id, &fx.organizer, TicketType::Regular, -1.0)
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn create_ticket_for_missing_event_is_not_found() {
        let fx = fixture().await;
        let result = fx
            .service
            .create_ticket(EventId::new(), &fx.organizer, TicketType::Regular, 50.0)
            .await;
        assert!(matches!(result, Err(ApiError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn buy_ticket_populates_number_and_payload() {
        let mut fx = fixture().await;
        let ticket = seed_ticket(&fx).await;

        let bought = fx.service.buy_ticket(ticket.id, &fx.attendee).await;
        let Ok(bought) = bought else {
            panic!("buy failed");
        };
        assert_eq!(bought.buyer_id, Some(fx.attendee.id));
        assert!(!bought.available);
        assert!(bought.state_consistent());

        let Some(number) = bought.ticket_number.as_deref() else {
            panic!("ticket number missing");
        };
        assert_number_format(number);

        let Some(payload) = bought.verification_payload.as_deref() else {
            panic!("payload missing");
        };
        assert_eq!(
            payload,
            verification_payload(number, fx.event.id, fx.attendee.id)
        );

        // The confirmation is dispatched after the sold state committed.
        let snapshot = tokio::time::timeout(Duration::from_secs(1), fx.sent.recv()).await;
        let Ok(Some(snapshot)) = snapshot else {
            panic!("confirmation not dispatched");
        };
        assert_eq!(snapshot.ticket.id, ticket.id);
        assert_eq!(snapshot.buyer.id, fx.attendee.id);
        assert_eq!(snapshot.event.id, fx.event.id);
    }

    #[tokio::test]
    async fn second_buyer_gets_conflict() {
        let fx = fixture().await;
        let ticket = seed_ticket(&fx).await;

        let first = fx.service.buy_ticket(ticket.id, &fx.attendee).await;
        assert!(first.is_ok());

        let store = fx.service.store().clone();
        let second_buyer = seed_user(&store, "Eve", Role::Attendee).await;
        let second = fx.service.buy_ticket(ticket.id, &second_buyer).await;
        assert!(matches!(second, Err(ApiError::TicketUnavailable(_))));

        // Exactly one buyer is bound.
        let Ok(Some(stored)) = store.ticket_by_id(ticket.id).await else {
            panic!("ticket disappeared");
        };
        assert_eq!(stored.buyer_id, Some(fx.attendee.id));
    }

    #[tokio::test]
    async fn concurrent_buyers_yield_one_success_and_one_conflict() {
        let fx = fixture().await;
        let ticket = seed_ticket(&fx).await;
        let store = fx.service.store().clone();
        let other = seed_user(&store, "Eve", Role::Attendee).await;

        let s1 = fx.service.clone();
        let s2 = fx.service.clone();
        let buyer1 = fx.attendee.clone();
        let id = ticket.id;
        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { s1.buy_ticket(id, &buyer1).await }),
            tokio::spawn(async move { s2.buy_ticket(id, &other).await }),
        );
        let results = [r1, r2].map(|r| match r {
            Ok(result) => result,
            Err(e) => panic!("task failed: {e}"),
        });

        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(ApiError::TicketUnavailable(_))))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);
    }

    #[tokio::test]
    async fn buy_missing_ticket_is_not_found() {
        let fx = fixture().await;
        let result = fx.service.buy_ticket(TicketId::new(), &fx.attendee).await;
        assert!(matches!(result, Err(ApiError::TicketNotFound(_))));
    }

    #[tokio::test]
    async fn notifier_failure_does_not_fail_allocation() {
        let mut fx = fixture_with(true).await;
        let ticket = seed_ticket(&fx).await;

        let bought = fx.service.buy_ticket(ticket.id, &fx.attendee).await;
        assert!(bought.is_ok());

        // The send was attempted (and failed) without affecting the result.
        let snapshot = tokio::time::timeout(Duration::from_secs(1), fx.sent.recv()).await;
        assert!(matches!(snapshot, Ok(Some(_))));
    }

    #[tokio::test]
    async fn verify_reports_valid_for_organizer_and_admin() {
        let fx = fixture().await;
        let ticket = seed_ticket(&fx).await;
        let Ok(bought) = fx.service.buy_ticket(ticket.id, &fx.attendee).await else {
            panic!("buy failed");
        };
        let Some(payload) = bought.verification_payload.as_deref() else {
            panic!("payload missing");
        };

        for requester in [&fx.organizer, &fx.admin] {
            let report = fx.service.verify(payload, requester).await;
            let Ok(report) = report else {
                panic!("verify failed");
            };
            assert!(report.is_valid);
            assert_eq!(report.event_name, fx.event.name);
            assert_eq!(report.buyer_name.as_deref(), Some(fx.attendee.name.as_str()));
            assert_eq!(
                report.buyer_email.as_deref(),
                Some(fx.attendee.email.as_str())
            );
            assert_eq!(report.ticket_number, bought.ticket_number);
        }
    }

    #[tokio::test]
    async fn verify_rejects_unrelated_requesters() {
        let fx = fixture().await;
        let ticket = seed_ticket(&fx).await;
        let Ok(bought) = fx.service.buy_ticket(ticket.id, &fx.attendee).await else {
            panic!("buy failed");
        };
        let Some(payload) = bought.verification_payload.as_deref() else {
            panic!("payload missing");
        };

        let store = fx.service.store().clone();
        let other_organizer = seed_user(&store, "Mallory", Role::Organizer).await;
        let result = fx.service.verify(payload, &other_organizer).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));

        let result = fx.service.verify(payload, &fx.attendee).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn verify_unknown_payload_is_not_found() {
        let fx = fixture().await;
        let result = fx.service.verify("TICKET:nope:EVENT:x:USER:y", &fx.admin).await;
        assert!(matches!(result, Err(ApiError::PayloadNotFound)));

        let result = fx.service.verify("", &fx.admin).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn verify_is_idempotent_and_read_only() {
        let fx = fixture().await;
        let ticket = seed_ticket(&fx).await;
        let Ok(bought) = fx.service.buy_ticket(ticket.id, &fx.attendee).await else {
            panic!("buy failed");
        };
        let Some(payload) = bought.verification_payload.clone() else {
            panic!("payload missing");
        };

        let first = fx.service.verify(&payload, &fx.organizer).await;
        let second = fx.service.verify(&payload, &fx.organizer).await;
        let (Ok(first), Ok(second)) = (first, second) else {
            panic!("verify failed");
        };
        assert_eq!(first.is_valid, second.is_valid);

        let Ok(Some(stored)) = fx.service.store().ticket_by_id(ticket.id).await else {
            panic!("ticket disappeared");
        };
        assert_eq!(stored.updated_at, bought.updated_at);
    }

    #[tokio::test]
    async fn scan_round_trips_a_sold_ticket() {
        let fx = fixture().await;
        let ticket = seed_ticket(&fx).await;
        let Ok(bought) = fx.service.buy_ticket(ticket.id, &fx.attendee).await else {
            panic!("buy failed");
        };
        let Some(payload) = bought.verification_payload.as_deref() else {
            panic!("payload missing");
        };

        let report = fx.service.scan(payload).await;
        let Ok(report) = report else {
            panic!("scan failed");
        };
        assert_eq!(report.ticket_number, bought.ticket_number);
        assert_eq!(report.event.id, fx.event.id);
        assert_eq!(report.status, "Valid");
        assert_eq!(report.buyer_email.as_deref(), Some(fx.attendee.email.as_str()));
    }

    #[tokio::test]
    async fn scan_of_never_sold_payload_is_invalid_not_a_crash() {
        let fx = fixture().await;
        // Hypothetically constructed: a ticket carrying a payload while
        // still available with no buyer.
        let mut ticket = Ticket::new(fx.event.id, TicketType::Regular, 50.0);
        ticket.verification_payload = Some("TICKET:TKT-1-AAAAA:EVENT:e:USER:u".to_string());
        let Ok(ticket) = fx.service.store().create_ticket(ticket).await else {
            panic!("ticket insert failed");
        };
        let Some(payload) = ticket.verification_payload.as_deref() else {
            panic!("payload missing");
        };

        let result = fx.service.scan(payload).await;
        assert!(matches!(result, Err(ApiError::InvalidTicket)));
    }

    #[tokio::test]
    async fn scan_unknown_payload_is_not_found() {
        let fx = fixture().await;
        let result = fx.service.scan("TICKET:nope:EVENT:x:USER:y").await;
        assert!(matches!(result, Err(ApiError::PayloadNotFound)));
    }

    #[tokio::test]
    async fn qr_image_is_buyer_only() {
        let fx = fixture().await;
        let ticket = seed_ticket(&fx).await;

        // Not bought yet: the requester is not the buyer.
        let result = fx.service.qr_image(ticket.id, &fx.attendee).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));

        let Ok(_) = fx.service.buy_ticket(ticket.id, &fx.attendee).await else {
            panic!("buy failed");
        };

        let image = fx.service.qr_image(ticket.id, &fx.attendee).await;
        let Ok(image) = image else {
            panic!("qr rendering failed");
        };
        assert!(image.data_url.starts_with("data:image/png;base64,"));
        assert!(image.ticket_number.is_some());

        let result = fx.service.qr_image(ticket.id, &fx.organizer).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn qr_image_without_payload_is_a_validation_error() {
        let fx = fixture().await;
        // Seed a sold-looking ticket with a buyer but no generated payload.
        let mut ticket = Ticket::new(fx.event.id, TicketType::Regular, 50.0);
        ticket.buyer_id = Some(fx.attendee.id);
        ticket.available = false;
        let Ok(ticket) = fx.service.store().create_ticket(ticket).await else {
            panic!("ticket insert failed");
        };

        let result = fx.service.qr_image(ticket.id, &fx.attendee).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn listings_filter_by_availability_buyer_and_authorization() {
        let fx = fixture().await;
        let first = seed_ticket(&fx).await;
        let _second = seed_ticket(&fx).await;

        let Ok(_) = fx.service.buy_ticket(first.id, &fx.attendee).await else {
            panic!("buy failed");
        };

        let available = fx.service.available_tickets(fx.event.id).await;
        assert_eq!(available.ok().map(|v| v.len()), Some(1));

        let mine = fx.service.my_tickets(&fx.attendee).await;
        let Ok(mine) = mine else {
            panic!("listing failed");
        };
        assert_eq!(mine.len(), 1);
        assert_eq!(mine.first().map(|t| t.id), Some(first.id));

        let all = fx.service.event_tickets(fx.event.id, &fx.organizer).await;
        assert_eq!(all.ok().map(|v| v.len()), Some(2));
        let all = fx.service.event_tickets(fx.event.id, &fx.admin).await;
        assert_eq!(all.ok().map(|v| v.len()), Some(2));

        let denied = fx.service.event_tickets(fx.event.id, &fx.attendee).await;
        assert!(matches!(denied, Err(ApiError::Unauthorized(_))));

        let missing = fx.service.available_tickets(EventId::new()).await;
        assert!(matches!(missing, Err(ApiError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn allocation_fails_after_bounded_collision_retries() {
        // Store double whose conditional update always reports a number
        // collision.
        #[derive(Debug, Clone)]
        struct CollidingStore(MemoryStore);

        impl TicketStore for CollidingStore {
            async fn create_ticket(&self, ticket: Ticket) -> Result<Ticket, ApiError> {
                self.0.create_ticket(ticket).await
            }
            async fn ticket_by_id(&self, id: TicketId) -> Result<Option<Ticket>, ApiError> {
                self.0.ticket_by_id(id).await
            }
            async fn ticket_by_payload(&self, p: &str) -> Result<Option<Ticket>, ApiError> {
                self.0.ticket_by_payload(p).await
            }
            async fn tickets_by_event(
                &self,
                event_id: EventId,
                only_available: bool,
            ) -> Result<Vec<Ticket>, ApiError> {
                self.0.tickets_by_event(event_id, only_available).await
            }
            async fn tickets_by_buyer(&self, buyer_id: UserId) -> Result<Vec<Ticket>, ApiError> {
                self.0.tickets_by_buyer(buyer_id).await
            }
            async fn mark_sold(
                &self,
                _id: TicketId,
                _buyer_id: UserId,
                _number: &str,
                _payload: &str,
            ) -> Result<MarkSoldOutcome, ApiError> {
                Ok(MarkSoldOutcome::DuplicateNumber)
            }
            async fn revert_to_available(&self, id: TicketId) -> Result<bool, ApiError> {
                self.0.revert_to_available(id).await
            }
            async fn delete_tickets_for_event(&self, event_id: EventId) -> Result<u64, ApiError> {
                self.0.delete_tickets_for_event(event_id).await
            }
            async fn ticket_counts(
                &self,
            ) -> Result<crate::persistence::TicketCounts, ApiError> {
                self.0.ticket_counts().await
            }
        }

        impl EventStore for CollidingStore {
            async fn create_event(&self, event: Event) -> Result<Event, ApiError> {
                self.0.create_event(event).await
            }
            async fn event_by_id(&self, id: EventId) -> Result<Option<Event>, ApiError> {
                self.0.event_by_id(id).await
            }
            async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
                self.0.list_events().await
            }
            async fn events_by_organizer(&self, id: UserId) -> Result<Vec<Event>, ApiError> {
                self.0.events_by_organizer(id).await
            }
            async fn delete_event(&self, id: EventId) -> Result<bool, ApiError> {
                self.0.delete_event(id).await
            }
        }

        impl UserStore for CollidingStore {
            async fn create_user(&self, user: User) -> Result<User, ApiError> {
                self.0.create_user(user).await
            }
            async fn user_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
                self.0.user_by_id(id).await
            }
            async fn delete_user(&self, id: UserId) -> Result<bool, ApiError> {
                self.0.delete_user(id).await
            }
            async fn count_users_by_role(&self, role: Role) -> Result<u64, ApiError> {
                self.0.count_users_by_role(role).await
            }
        }

        let inner = MemoryStore::new();
        let store = CollidingStore(inner.clone());
        let (notifier, _rx) = RecordingNotifier::new(false);
        let service = TicketService::new(store, notifier);

        let organizer = seed_user(&inner, "Olive", Role::Organizer).await;
        let attendee = seed_user(&inner, "Ada", Role::Attendee).await;
        let event = match Event::new(
            "Summer Fest".to_string(),
            "Open-air festival".to_string(),
            "rock".to_string(),
            EventCategory::Music,
            50.0,
            organizer.id,
        ) {
            Ok(event) => event,
            Err(e) => panic!("event creation failed: {e}"),
        };
        let Ok(event) = inner.create_event(event).await else {
            panic!("event insert failed");
        };
        let Ok(ticket) = inner
            .create_ticket(Ticket::new(event.id, TicketType::Regular, 50.0))
            .await
        else {
            panic!("ticket insert failed");
        };

        let result = service.buy_ticket(ticket.id, &attendee).await;
        assert!(matches!(
            result,
            Err(ApiError::AllocationExhausted {
                attempts: MAX_ALLOCATION_ATTEMPTS
            })
        ));
    }
}
