//! Admin account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use event_desk_core::{AdminId, Email};

/// An admin account as stored (domain type).
///
/// Implements `Debug` manually to keep the password hash out of logs.
#[derive(Clone)]
pub struct AdminAccount {
    /// Unique admin ID.
    pub id: AdminId,
    /// Normalized login email.
    pub email: Email,
    /// Argon2 PHC string. Rows written by hand may hold anything, so it is
    /// parsed again on every login.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// The admin identity carried by a verified bearer token.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminId,
    pub email: String,
}

impl From<&AdminAccount> for CurrentAdmin {
    fn from(admin: &AdminAccount) -> Self {
        Self {
            id: admin.id,
            email: admin.email.as_str().to_owned(),
        }
    }
}
