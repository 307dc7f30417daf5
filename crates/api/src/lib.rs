//! Event Desk API library.
//!
//! HTTP API for a public event catalog with per-event registration and a
//! token-protected admin surface for managing events and viewing
//! registrations. The binary in `main.rs` wires configuration, logging and
//! Sentry around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header::InvalidHeaderValue},
    routing::get,
};

use state::AppState;

/// Path prefix the API routes are served under.
pub const API_PREFIX: &str = "/api";

/// Build the full application: health checks plus the API under `/api`,
/// with CORS applied.
///
/// # Errors
///
/// Returns `InvalidHeaderValue` if the configured client origin cannot be
/// used as a CORS header.
pub fn app(state: AppState) -> Result<Router, InvalidHeaderValue> {
    let cors = middleware::cors_layer(state.config())?;

    Ok(Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest(API_PREFIX, routes::routes(&state))
        .layer(cors)
        .with_state(state))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
