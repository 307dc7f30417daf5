//! Authentication service.
//!
//! Admins log in with email and password; a successful login yields a signed
//! bearer token (see [`TokenKeys`]) that the admin routes require.

mod error;
mod token;

pub use error::AuthError;
pub use token::TokenKeys;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use event_desk_core::Email;

use crate::db::AdminRepository;
use crate::models::AdminAccount;

/// Authentication service.
pub struct AuthService<'a> {
    admins: AdminRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            admins: AdminRepository::new(pool),
        }
    }

    /// Login with email and password.
    ///
    /// A malformed email, an unknown email and a wrong password all produce
    /// the same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminAccount, AuthError> {
        let email = Email::normalize(email).map_err(|_| AuthError::InvalidCredentials)?;

        let admin = self
            .admins
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &admin.password_hash)?;

        Ok(admin)
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC string.
///
/// A stored value that is not a valid PHC string counts as a mismatch.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
