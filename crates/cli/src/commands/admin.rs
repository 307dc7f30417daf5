//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin (fails if the email is taken)
//! ed-cli admin create -e admin@example.com -p 'correct horse'
//!
//! # Create or reset
//! ed-cli admin set-password -e admin@example.com -p 'battery staple'
//! ```

use thiserror::Error;

use event_desk_api::db::{AdminRepository, RepositoryError};
use event_desk_api::services::auth::{AuthError, hash_password};
use event_desk_core::{AdminId, Email, EmailError};

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Empty password.
    #[error("Password must not be empty")]
    EmptyPassword,

    /// Admin already exists.
    #[error("Admin already exists with email: {0}")]
    AdminExists(String),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hash(#[from] AuthError),

    /// Database error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create a new admin account.
///
/// # Returns
///
/// The ID of the created admin.
pub async fn create(email: &str, password: &str) -> Result<AdminId, AdminError> {
    let (email, password_hash) = prepare(email, password)?;
    let pool = connect().await?;

    tracing::info!("Creating admin: {}", email);

    let admin = AdminRepository::new(&pool)
        .create(&email, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::AdminExists(email.to_string()),
            other => other.into(),
        })?;

    tracing::info!(
        "Admin created successfully! ID: {}, Email: {}",
        admin.id,
        admin.email
    );

    Ok(admin.id)
}

/// Create the admin account, or replace the password of an existing one.
///
/// # Returns
///
/// The ID of the admin.
pub async fn set_password(email: &str, password: &str) -> Result<AdminId, AdminError> {
    let (email, password_hash) = prepare(email, password)?;
    let pool = connect().await?;

    let admin = AdminRepository::new(&pool)
        .upsert_password(&email, &password_hash)
        .await?;

    tracing::info!("Admin created/updated: {} (ID: {})", admin.email, admin.id);

    Ok(admin.id)
}

/// Validate input and hash the password before touching the database.
fn prepare(email: &str, password: &str) -> Result<(Email, String), AdminError> {
    let email = Email::normalize(email)?;

    if password.is_empty() {
        return Err(AdminError::EmptyPassword);
    }

    Ok((email, hash_password(password)?))
}
