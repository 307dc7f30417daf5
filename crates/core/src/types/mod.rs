//! Core types for Event Desk.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! JSON shapes exchanged between the API and its clients.

pub mod email;
pub mod event;
pub mod id;
pub mod message;
pub mod registration;

pub use email::{Email, EmailError};
pub use event::{Event, EventFields};
pub use id::*;
pub use message::{ApiMessage, LoginResponse};
pub use registration::{Registration, RegistrationRequest, RegistrationWithEvent};
