//! Event entity and category classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, UserId};

/// Maximum length of an event name.
pub const MAX_NAME_LEN: usize = 100;
/// Maximum length of an event description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
/// Maximum length of an event genre.
pub const MAX_GENRE_LEN: usize = 50;

/// Closed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Concerts and musical performances.
    Music,
    /// Sporting events.
    Sports,
    /// Technology conferences and meetups.
    Technology,
    /// Business and networking events.
    Business,
    /// General entertainment.
    Entertainment,
    /// Educational events.
    Education,
    /// Arts and culture.
    Arts,
    /// Food and drink events.
    Food,
    /// Health and wellness events.
    Health,
    /// Anything else.
    Other,
}

impl EventCategory {
    /// Returns the wire/storage form of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Sports => "sports",
            Self::Technology => "technology",
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::Education => "education",
            Self::Arts => "arts",
            Self::Food => "food",
            Self::Health => "health",
            Self::Other => "other",
        }
    }

    /// Parses a stored or submitted category string.
    ///
    /// Returns `None` for anything outside the closed set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "music" => Some(Self::Music),
            "sports" => Some(Self::Sports),
            "technology" => Some(Self::Technology),
            "business" => Some(Self::Business),
            "entertainment" => Some(Self::Entertainment),
            "education" => Some(Self::Education),
            "arts" => Some(Self::Arts),
            "food" => Some(Self::Food),
            "health" => Some(Self::Health),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event that tickets are sold for.
///
/// Deleting an event cascades to delete all of its tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Event name (max 100 characters).
    pub name: String,
    /// Event description (max 1000 characters).
    pub description: String,
    /// Free-form genre label (max 50 characters).
    pub genre: String,
    /// Category from the closed set.
    pub category: EventCategory,
    /// Base price. Non-negative.
    pub price: f64,
    /// Owning organizer.
    pub organizer_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event owned by `organizer_id`, validating field limits.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when a required field is empty, a
    /// length limit is exceeded, or the price is negative.
    pub fn new(
        name: String,
        description: String,
        genre: String,
        category: EventCategory,
        price: f64,
        organizer_id: UserId,
    ) -> Result<Self, String> {
        let name = name.trim().to_string();
        let genre = genre.trim().to_string();

        if name.is_empty() {
            return Err("event name is required".to_string());
        }
        if name.len() > MAX_NAME_LEN {
            return Err(format!("event name cannot exceed {MAX_NAME_LEN} characters"));
        }
        if description.is_empty() {
            return Err("event description is required".to_string());
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(format!(
                "description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            ));
        }
        if genre.is_empty() {
            return Err("event genre is required".to_string());
        }
        if genre.len() > MAX_GENRE_LEN {
            return Err(format!("genre cannot exceed {MAX_GENRE_LEN} characters"));
        }
        if price < 0.0 {
            return Err("price cannot be negative".to_string());
        }

        let now = Utc::now();
        Ok(Self {
            id: EventId::new(),
            name,
            description,
            genre,
            category,
            price,
            organizer_id,
            created_at: now,
            updated_at: now,
        })
    }
}
