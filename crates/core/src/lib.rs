//! Event Desk Core - Shared types library.
//!
//! This crate provides common types used across all Event Desk components:
//! - `api` - HTTP API for the event catalog, registrations and admin panel
//! - `client` - Typed HTTP client for the API
//! - `cli` - Command-line tools for migrations, provisioning and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, plus the
//!   event and registration JSON shapes shared by the API and client

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
