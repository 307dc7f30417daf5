//! Public event catalog routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use event_desk_core::{Event, EventId};

use crate::db::EventRepository;
use crate::error::AppError;
use crate::state::AppState;

pub const EVENT_NOT_FOUND_MESSAGE: &str = "Event not found";

/// Build the public events router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list))
        .route("/events/{id}", get(show))
}

/// Parse an `{id}` path segment.
///
/// # Errors
///
/// Returns `AppError::Validation` if the segment is not an integer.
pub fn parse_event_id(raw: &str) -> Result<EventId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("Invalid event id".to_owned()))
}

/// Map a repository miss to the client-facing 404.
pub(crate) fn event_not_found() -> AppError {
    AppError::NotFound(EVENT_NOT_FOUND_MESSAGE.to_owned())
}

/// List all events, soonest first.
///
/// GET /events
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let events = EventRepository::new(state.pool()).list().await?;
    Ok(Json(events))
}

/// Get one event.
///
/// GET /events/{id}
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let id = parse_event_id(&id)?;

    EventRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(event_not_found)
}
