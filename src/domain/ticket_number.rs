//! Ticket number and verification payload generation.
//!
//! Both values are derived at the moment of first sale and never change
//! afterward. The formats are load-bearing: existing tickets in the wild
//! carry them, so they must be reproduced exactly.
//!
//! - ticket number: `TKT-<millisecond unix timestamp>-<5-char A-Z0-9 suffix>`
//! - payload: `TICKET:<number>:EVENT:<event id>:USER:<buyer id>`

use chrono::Utc;
use rand::seq::IndexedRandom;

use super::{EventId, UserId};

const SUFFIX_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 5;

/// Generates a fresh candidate ticket number.
///
/// The millisecond timestamp gives a monotonically-increasing component and
/// the random suffix makes same-millisecond collisions unlikely; the store's
/// unique index is the final authority, and the allocation operation retries
/// with a new candidate when it trips.
#[must_use]
pub fn generate_ticket_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(SUFFIX_ALPHABET.choose(&mut rng).copied().unwrap_or(b'0')))
        .collect();
    format!("TKT-{millis}-{suffix}")
}

/// Encodes the verification payload carried by the ticket's QR code.
///
/// Verification looks the payload up by equality against the stored value;
/// the embedded fields exist so a scanned code is self-describing.
#[must_use]
pub fn verification_payload(ticket_number: &str, event_id: EventId, buyer_id: UserId) -> String {
    format!("TICKET:{ticket_number}:EVENT:{event_id}:USER:{buyer_id}")
}
