//! SMTP ticket confirmation delivery using Lettre.

use std::fmt;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::{ConfirmationSnapshot, NotifyError, TicketNotifier};
use crate::config::MailConfig;
use crate::qr;

/// SMTP notifier backed by a blocking Lettre transport.
///
/// A new transport is built per send and the blocking send runs on the
/// Tokio blocking pool. When `enabled` is false (no SMTP settings
/// configured), sends become logged no-ops so environments without a mail
/// relay still allocate tickets normally.
#[derive(Clone)]
pub struct SmtpNotifier {
    host: String,
    port: u16,
    credentials: Credentials,
    from_email: String,
    from_name: String,
    enabled: bool,
}

impl fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// Creates a notifier from mail configuration.
    #[must_use]
    pub fn new(config: MailConfig) -> Self {
        Self {
            host: config.smtp_host,
            port: config.smtp_port,
            credentials: Credentials::new(config.smtp_username, config.smtp_password),
            from_email: config.from_email,
            from_name: config.from_name,
            enabled: config.enabled,
        }
    }

    fn build_transport(&self) -> Result<SmtpTransport, NotifyError> {
        Ok(SmtpTransport::relay(&self.host)
            .map_err(|e| NotifyError::Transport(format!("SMTP relay error: {e}")))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    fn confirmation_html(snapshot: &ConfirmationSnapshot) -> String {
        let ticket = &snapshot.ticket;
        let event = &snapshot.event;
        let buyer = &snapshot.buyer;

        let ticket_number = ticket.ticket_number.as_deref().unwrap_or("-");
        let purchase_date = ticket.updated_at.format("%A, %B %-d, %Y");

        let qr_section = ticket
            .verification_payload
            .as_deref()
            .and_then(|payload| qr::render_data_url(payload, 200).ok())
            .map(|data_url| {
                format!(
                    r#"<div style="text-align: center; margin: 30px 0;">
  <h4>Your QR Code Ticket</h4>
  <img src="{data_url}" alt="QR Code" style="width: 200px; height: 200px;"/>
  <p style="color: #666; font-size: 14px;">Present this QR code at the event entrance for quick verification</p>
</div>"#
                )
            })
            .unwrap_or_default();

        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1>EventHub</h1>
  <h2>Ticket Confirmed!</h2>
  <h3>Hello {buyer_name}!</h3>
  <p>Your ticket purchase was successful. Here are your details:</p>
  <h4>Event Details</h4>
  <table>
    <tr><td><strong>Event Name:</strong></td><td>{event_name}</td></tr>
    <tr><td><strong>Category:</strong></td><td>{category}</td></tr>
    <tr><td><strong>Genre:</strong></td><td>{genre}</td></tr>
    <tr><td><strong>Description:</strong></td><td>{description}</td></tr>
  </table>
  <h4>Ticket Information</h4>
  <table>
    <tr><td><strong>Ticket Number:</strong></td><td>{ticket_number}</td></tr>
    <tr><td><strong>Ticket Type:</strong></td><td>{ticket_type}</td></tr>
    <tr><td><strong>Price Paid:</strong></td><td>${price}</td></tr>
    <tr><td><strong>Purchase Date:</strong></td><td>{purchase_date}</td></tr>
  </table>
  {qr_section}
  <p>Thank you for choosing EventHub!</p>
</div>"#,
            buyer_name = buyer.name,
            event_name = event.name,
            category = event.category,
            genre = event.genre,
            description = event.description,
            ticket_type = ticket.ticket_type,
            price = ticket.price,
        )
    }
}

impl TicketNotifier for SmtpNotifier {
    async fn send_ticket_confirmation(
        &self,
        snapshot: &ConfirmationSnapshot,
    ) -> Result<(), NotifyError> {
        if !self.enabled {
            tracing::debug!(
                buyer = %snapshot.buyer.email,
                "email delivery disabled; skipping ticket confirmation"
            );
            return Ok(());
        }

        let email = Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| NotifyError::Build(format!("invalid from address: {e}")))?,
            )
            .to(snapshot
                .buyer
                .email
                .parse()
                .map_err(|e| NotifyError::Build(format!("invalid to address: {e}")))?)
            .subject(format!("Ticket Confirmation - {}", snapshot.event.name))
            .header(ContentType::TEXT_HTML)
            .body(Self::confirmation_html(snapshot))
            .map_err(|e| NotifyError::Build(format!("failed to build email: {e}")))?;

        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| NotifyError::Transport(format!("failed to send email: {e}")))
        })
        .await
        .map_err(|e| NotifyError::Transport(format!("email task failed: {e}")))?
        .map(|_| ())
    }
}
