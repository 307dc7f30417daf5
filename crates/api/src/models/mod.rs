//! Domain models for the API.
//!
//! Wire shapes shared with clients live in `event_desk_core`; this module adds
//! the validated inputs the handlers build from them and the server-only admin
//! account type.

pub mod admin;
pub mod event;
pub mod registration;

use thiserror::Error;

pub use admin::{AdminAccount, CurrentAdmin};
pub use event::{EventChanges, NewEvent, parse_event_date};
pub use event_desk_core::{Event, Registration, RegistrationWithEvent};
pub use registration::NewRegistration;

/// Client input that failed validation. The message is shown to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
