//! Admin account repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use event_desk_core::{AdminId, Email};

use super::{RepositoryError, Violation, violation};
use crate::models::AdminAccount;

#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminRow> for AdminAccount {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let email = Email::normalize(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AdminId::new(row.id),
            email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for admin account database operations.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an admin by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<AdminAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            SELECT id, email, password_hash, created_at, updated_at
            FROM desk.admin
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminAccount, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            INSERT INTO desk.admin (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, updated_at
            ",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if violation(&e) == Some(Violation::Unique) {
                RepositoryError::Conflict("admin email already exists".to_owned())
            } else {
                RepositoryError::Database(e)
            }
        })?;

        row.try_into()
    }

    /// Create the admin, or replace the password of an existing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminAccount, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            INSERT INTO desk.admin (email, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                updated_at = NOW()
            RETURNING id, email, password_hash, created_at, updated_at
            ",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }
}
