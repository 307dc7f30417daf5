//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! ed-cli migrate
//! ```
//!
//! # Migration Files
//!
//! `crates/api/migrations/`, embedded into the binary at build time.

use thiserror::Error;

use event_desk_api::db;

use super::{ConnectError, connect};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply all pending migrations.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
