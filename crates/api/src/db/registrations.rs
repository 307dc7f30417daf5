//! Registration repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use event_desk_core::{Event, EventId, Registration, RegistrationId, RegistrationWithEvent};

use super::{RepositoryError, Violation, violation};
use crate::models::NewRegistration;

#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: i32,
    name: String,
    email: String,
    phone: Option<String>,
    event_id: i32,
    created_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self {
            id: RegistrationId::new(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            event_id: EventId::new(row.event_id),
            created_at: row.created_at,
        }
    }
}

/// A registration joined with its event; event columns are prefixed `event_`.
#[derive(Debug, sqlx::FromRow)]
struct RegistrationWithEventRow {
    id: i32,
    name: String,
    email: String,
    phone: Option<String>,
    event_id: i32,
    created_at: DateTime<Utc>,
    event_title: String,
    event_description: String,
    event_date: DateTime<Utc>,
    event_location: String,
    event_capacity: Option<i32>,
    event_image_url: String,
    event_created_at: DateTime<Utc>,
    event_updated_at: DateTime<Utc>,
}

impl From<RegistrationWithEventRow> for RegistrationWithEvent {
    fn from(row: RegistrationWithEventRow) -> Self {
        let event_id = EventId::new(row.event_id);

        Self {
            registration: Registration {
                id: RegistrationId::new(row.id),
                name: row.name,
                email: row.email,
                phone: row.phone,
                event_id,
                created_at: row.created_at,
            },
            event: Event {
                id: event_id,
                title: row.event_title,
                description: row.event_description,
                date: row.event_date,
                location: row.event_location,
                capacity: row.event_capacity,
                image_url: row.event_image_url,
                created_at: row.event_created_at,
                updated_at: row.event_updated_at,
            },
        }
    }
}

/// Repository for registration database operations.
pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    /// Create a new registration repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register an attendee for an event.
    ///
    /// The existence check and the insert are one statement, and the
    /// `(email, event_id)` constraint decides between concurrent duplicates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the event does not exist (or is
    /// deleted concurrently).
    /// Returns `RepositoryError::Conflict` if this email already registered.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        event_id: EventId,
        registration: &NewRegistration,
    ) -> Result<Registration, RepositoryError> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r"
            INSERT INTO desk.registration (name, email, phone, event_id)
            SELECT $2, $3, $4, e.id
            FROM desk.event e
            WHERE e.id = $1
            RETURNING id, name, email, phone, event_id, created_at
            ",
        )
        .bind(event_id)
        .bind(&registration.name)
        .bind(&registration.email)
        .bind(registration.phone.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::Unique) => RepositoryError::Conflict(
                "You have already registered for this event".to_owned(),
            ),
            Some(Violation::ForeignKey) => RepositoryError::NotFound,
            None => RepositoryError::Database(e),
        })?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// List every registration with its event, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_events(&self) -> Result<Vec<RegistrationWithEvent>, RepositoryError> {
        let rows = sqlx::query_as::<_, RegistrationWithEventRow>(
            r"
            SELECT r.id, r.name, r.email, r.phone, r.event_id, r.created_at,
                   e.title AS event_title,
                   e.description AS event_description,
                   e.date AS event_date,
                   e.location AS event_location,
                   e.capacity AS event_capacity,
                   e.image_url AS event_image_url,
                   e.created_at AS event_created_at,
                   e.updated_at AS event_updated_at
            FROM desk.registration r
            JOIN desk.event e ON e.id = r.event_id
            ORDER BY r.created_at DESC, r.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count registrations for one event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_event(&self, event_id: EventId) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM desk.registration WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }
}
