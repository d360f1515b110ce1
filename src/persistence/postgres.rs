//! PostgreSQL implementation of the record store.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{EventRow, TicketCounts, TicketRow, UserRow};
use super::{EventStore, MarkSoldOutcome, TicketStore, UserStore};
use crate::domain::{Event, EventId, Role, Ticket, TicketId, User, UserId};
use crate::error::ApiError;

/// PostgreSQL-backed record store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a store around an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database with the given pool settings.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`sqlx::Error`] when the connection cannot be
    /// established.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(connect_timeout)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies pending migrations from the bundled `migrations/` directory.
    ///
    /// # Errors
    ///
    /// Returns a [`sqlx::migrate::MigrateError`] when a migration fails.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

impl TicketStore for PgStore {
    async fn create_ticket(&self, ticket: Ticket) -> Result<Ticket, ApiError> {
        let row = sqlx::query_as::<_, TicketRow>(
            "INSERT INTO tickets \
             (id, event_id, ticket_type, price, buyer_id, available, ticket_number, \
              verification_payload, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(ticket.id.as_uuid())
        .bind(ticket.event_id.as_uuid())
        .bind(ticket.ticket_type.as_str())
        .bind(ticket.price)
        .bind(ticket.buyer_id.map(uuid::Uuid::from))
        .bind(ticket.available)
        .bind(&ticket.ticket_number)
        .bind(&ticket.verification_payload)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        row.try_into()
    }

    async fn ticket_by_id(&self, id: TicketId) -> Result<Option<Ticket>, ApiError> {
        let row = sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn ticket_by_payload(&self, payload: &str) -> Result<Option<Ticket>, ApiError> {
        let row = sqlx::query_as::<_, TicketRow>(
            "SELECT * FROM tickets WHERE verification_payload = $1",
        )
        .bind(payload)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn tickets_by_event(
        &self,
        event_id: EventId,
        only_available: bool,
    ) -> Result<Vec<Ticket>, ApiError> {
        let rows = if only_available {
            sqlx::query_as::<_, TicketRow>(
                "SELECT * FROM tickets WHERE event_id = $1 AND available \
                 ORDER BY created_at ASC",
            )
            .bind(event_id.as_uuid())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, TicketRow>(
                "SELECT * FROM tickets WHERE event_id = $1 ORDER BY created_at ASC",
            )
            .bind(event_id.as_uuid())
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn tickets_by_buyer(&self, buyer_id: UserId) -> Result<Vec<Ticket>, ApiError> {
        let rows = sqlx::query_as::<_, TicketRow>(
            "SELECT * FROM tickets WHERE buyer_id = $1 ORDER BY created_at ASC",
        )
        .bind(buyer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn mark_sold(
        &self,
        id: TicketId,
        buyer_id: UserId,
        ticket_number: &str,
        payload: &str,
    ) -> Result<MarkSoldOutcome, ApiError> {
        // Single conditional update: the availability precondition and the
        // mutation commit together, and the number/payload are assigned only
        // when none exist yet.
        let result = sqlx::query_as::<_, TicketRow>(
            "UPDATE tickets SET \
                buyer_id = $2, \
                available = FALSE, \
                ticket_number = COALESCE(ticket_number, $3), \
                verification_payload = COALESCE(verification_payload, $4), \
                updated_at = now() \
             WHERE id = $1 AND available AND buyer_id IS NULL \
             RETURNING *",
        )
        .bind(id.as_uuid())
        .bind(buyer_id.as_uuid())
        .bind(ticket_number)
        .bind(payload)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => Ok(MarkSoldOutcome::Sold(row.try_into()?)),
            Ok(None) => Ok(MarkSoldOutcome::Unavailable),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(MarkSoldOutcome::DuplicateNumber)
            }
            Err(e) => Err(ApiError::Persistence(e.to_string())),
        }
    }

    async fn revert_to_available(&self, id: TicketId) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE tickets SET \
                buyer_id = NULL, \
                available = TRUE, \
                ticket_number = NULL, \
                verification_payload = NULL, \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_tickets_for_event(&self, event_id: EventId) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM tickets WHERE event_id = $1")
            .bind(event_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn ticket_counts(&self) -> Result<TicketCounts, ApiError> {
        let (total, sold) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE NOT available) FROM tickets",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        let total = u64::try_from(total).unwrap_or(0);
        let sold = u64::try_from(sold).unwrap_or(0);
        Ok(TicketCounts {
            total,
            sold,
            available: total.saturating_sub(sold),
        })
    }
}

impl EventStore for PgStore {
    async fn create_event(&self, event: Event) -> Result<Event, ApiError> {
        let row = sqlx::query_as::<_, EventRow>(
            "INSERT INTO events \
             (id, name, description, genre, category, price, organizer_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(event.id.as_uuid())
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.genre)
        .bind(event.category.as_str())
        .bind(event.price)
        .bind(event.organizer_id.as_uuid())
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        row.try_into()
    }

    async fn event_by_id(&self, id: EventId) -> Result<Option<Event>, ApiError> {
        let row = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let rows = sqlx::query_as::<_, EventRow>("SELECT * FROM events ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn events_by_organizer(&self, organizer_id: UserId) -> Result<Vec<Event>, ApiError> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT * FROM events WHERE organizer_id = $1 ORDER BY created_at DESC",
        )
        .bind(organizer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

impl UserStore for PgStore {
    async fn create_user(&self, user: User) -> Result<User, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, name, email, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Persistence(e.to_string()))?;

        row.try_into()
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_users_by_role(&self, role: Role) -> Result<u64, ApiError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
