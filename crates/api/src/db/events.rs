//! Event catalog repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use event_desk_core::{Event, EventId};

use super::{RepositoryError, Violation, violation};
use crate::models::{EventChanges, NewEvent};

const EVENT_COLUMNS: &str =
    "id, title, description, date, location, capacity, image_url, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i32,
    title: String,
    description: String,
    date: DateTime<Utc>,
    location: String,
    capacity: Option<i32>,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::new(row.id),
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            capacity: row.capacity,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn title_conflict(e: sqlx::Error) -> RepositoryError {
    if violation(&e) == Some(Violation::Unique) {
        RepositoryError::Conflict("An event with this title already exists".to_owned())
    } else {
        RepositoryError::Database(e)
    }
}

/// Repository for event database operations.
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every event, soonest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Event>, RepositoryError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM desk.event ORDER BY date ASC, id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an event by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM desk.event WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a new event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the title is already used.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, event: &NewEvent) -> Result<Event, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r"
            INSERT INTO desk.event (title, description, date, location, capacity, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EVENT_COLUMNS}
            "
        ))
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.capacity)
        .bind(&event.image_url)
        .fetch_one(self.pool)
        .await
        .map_err(title_conflict)?;

        Ok(row.into())
    }

    /// Merge `changes` into the stored event in one statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no event has this ID.
    /// Returns `RepositoryError::Conflict` if the new title is already used.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: EventId,
        changes: &EventChanges,
    ) -> Result<Event, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r"
            UPDATE desk.event
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                location = COALESCE($5, location),
                capacity = CASE WHEN $6 THEN $7 ELSE capacity END,
                image_url = COALESCE($8, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.date)
        .bind(changes.location.as_deref())
        .bind(changes.capacity.is_some())
        .bind(changes.capacity.flatten())
        .bind(changes.image_url.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(title_conflict)?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete an event and, by cascade, its registrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no event has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: EventId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM desk.event WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Insert the event, or overwrite the one with the same title.
    ///
    /// Used by seeding so repeated runs converge on the same catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_by_title(&self, event: &NewEvent) -> Result<Event, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r"
            INSERT INTO desk.event (title, description, date, location, capacity, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (title) DO UPDATE
            SET description = EXCLUDED.description,
                date = EXCLUDED.date,
                location = EXCLUDED.location,
                capacity = EXCLUDED.capacity,
                image_url = EXCLUDED.image_url,
                updated_at = NOW()
            RETURNING {EVENT_COLUMNS}
            "
        ))
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.capacity)
        .bind(&event.image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
