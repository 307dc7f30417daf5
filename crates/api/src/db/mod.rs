//! Database operations for the Event Desk `PostgreSQL` store.
//!
//! ## Tables (schema `desk`)
//!
//! - `admin` - Admin accounts (email + Argon2 password hash)
//! - `event` - Public event catalog, `title` unique
//! - `registration` - One row per `(email, event_id)`, cascades with its event
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/`, embedded in [`MIGRATOR`]
//! and run explicitly via:
//! ```bash
//! cargo run -p event-desk-cli -- migrate
//! ```

pub mod admins;
pub mod events;
pub mod registrations;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admins::AdminRepository;
pub use events::EventRepository;
pub use registrations::RegistrationRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate registration).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Which constraint family a failed statement tripped, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
}

/// Classify a sqlx error as a unique or foreign key violation.
pub(crate) fn violation(err: &sqlx::Error) -> Option<Violation> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };

    if db_err.is_unique_violation() {
        Some(Violation::Unique)
    } else if db_err.is_foreign_key_violation() {
        Some(Violation::ForeignKey)
    } else {
        None
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    pool_options()
        .connect(database_url.expose_secret())
        .await
}

/// Create a pool that connects on first use.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_lazy_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    pool_options()
        .min_connections(0)
        .connect_lazy(database_url.expose_secret())
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
