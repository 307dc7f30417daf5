//! Admin event management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
};

use event_desk_core::{Event, EventFields};

use super::events::{event_not_found, parse_event_id};
use crate::db::{EventRepository, RepositoryError};
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::middleware::RequireAdminAuth;
use crate::models::{EventChanges, NewEvent};
use crate::state::AppState;

/// Build the admin events router. Callers must layer `require_admin` on it.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/events", post(create))
        .route("/admin/events/{id}", put(update).delete(delete))
}

/// Create an event.
///
/// POST /admin/events
async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(fields): ApiJson<EventFields>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let new_event = NewEvent::from_fields(fields)?;
    let event = EventRepository::new(state.pool()).create(&new_event).await?;

    tracing::info!(admin_id = %admin.id, event_id = %event.id, "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// Merge the given fields into an event.
///
/// PUT /admin/events/{id}
async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<String>,
    ApiJson(fields): ApiJson<EventFields>,
) -> Result<Json<Event>, AppError> {
    let id = parse_event_id(&id)?;
    let changes = EventChanges::from_fields(fields)?;

    let event = EventRepository::new(state.pool())
        .update(id, &changes)
        .await
        .map_err(not_found_as_event)?;

    tracing::info!(admin_id = %admin.id, event_id = %event.id, "Event updated");

    Ok(Json(event))
}

/// Delete an event and its registrations.
///
/// DELETE /admin/events/{id}
async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_event_id(&id)?;

    EventRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found_as_event)?;

    tracing::info!(admin_id = %admin.id, event_id = %id, "Event deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn not_found_as_event(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => event_not_found(),
        other => other.into(),
    }
}
