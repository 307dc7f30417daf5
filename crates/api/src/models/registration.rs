//! Validated registration input.

use event_desk_core::{Email, RegistrationRequest};

use super::ValidationError;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Name and email are required";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";

/// Longest accepted attendee name.
pub const MAX_NAME_LENGTH: usize = 200;

/// A public registration request after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub name: String,
    /// Trimmed and lowercased.
    pub email: Email,
    pub phone: Option<String>,
}

impl NewRegistration {
    /// Validate a registration form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name or email is missing or blank, the
    /// name is too long, or the email is malformed.
    pub fn from_request(request: RegistrationRequest) -> Result<Self, ValidationError> {
        let name = request.name.as_deref().map(str::trim).unwrap_or_default();
        let email = request.email.as_deref().map(str::trim).unwrap_or_default();

        if name.is_empty() || email.is_empty() {
            return Err(ValidationError::new(REQUIRED_FIELDS_MESSAGE));
        }

        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::new(format!(
                "Name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }

        let email =
            Email::normalize(email).map_err(|_| ValidationError::new(INVALID_EMAIL_MESSAGE))?;

        let phone = request
            .phone
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());

        Ok(Self {
            name: name.to_owned(),
            email,
            phone,
        })
    }
}
