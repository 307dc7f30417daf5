//! HTTP middleware for the API.

pub mod auth;
pub mod cors;

pub use auth::{RequireAdminAuth, require_admin};
pub use cors::cors_layer;
