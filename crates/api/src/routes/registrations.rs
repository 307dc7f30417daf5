//! Registration routes: public sign-up and the admin listing.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use event_desk_core::{Registration, RegistrationRequest, RegistrationWithEvent};

use super::events::{event_not_found, parse_event_id};
use crate::db::{RegistrationRepository, RepositoryError};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::middleware::RequireAdminAuth;
use crate::models::NewRegistration;
use crate::state::AppState;

/// Build the public registration router.
pub fn router() -> Router<AppState> {
    Router::new().route("/events/{id}/register", post(register))
}

/// Build the admin registration router. Callers must layer `require_admin` on it.
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/admin/registrations", get(list))
}

/// Register for an event.
///
/// POST /events/{id}/register
async fn register(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<RegistrationRequest>,
) -> Result<(StatusCode, Json<Registration>), AppError> {
    let event_id = parse_event_id(&id)?;
    let new_registration = NewRegistration::from_request(request)?;

    let registration = RegistrationRepository::new(state.pool())
        .create(event_id, &new_registration)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => event_not_found(),
            other => other.into(),
        })?;

    tracing::info!(
        event_id = %event_id,
        registration_id = %registration.id,
        "Registration created"
    );

    Ok((StatusCode::CREATED, Json(registration)))
}

/// List all registrations with their events, newest first.
///
/// GET /admin/registrations
async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<RegistrationWithEvent>>, AppError> {
    let registrations = RegistrationRepository::new(state.pool())
        .list_with_events()
        .await?;

    Ok(Json(registrations))
}
