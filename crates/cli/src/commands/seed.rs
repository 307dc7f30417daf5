//! Seed the event catalog.
//!
//! Events are upserted by title, so running the command again updates the
//! existing rows instead of duplicating them.
//!
//! # Usage
//!
//! ```bash
//! # Built-in sample catalog
//! ed-cli seed events
//!
//! # Your own catalog: a JSON array of event objects
//! ed-cli seed events --file events.json
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::info;

use event_desk_api::db::{EventRepository, RepositoryError};
use event_desk_api::models::{NewEvent, ValidationError};
use event_desk_core::EventFields;

use super::{ConnectError, connect};

/// Sample catalog used when no file is given.
const SAMPLE_EVENTS: &str = include_str!("../../data/events.json");

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Seed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Seed file is not a JSON array of events.
    #[error("Invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry failed validation.
    #[error("Event #{index}: {source}")]
    Invalid {
        index: usize,
        source: ValidationError,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Upsert every event in `file`, or the sample catalog.
pub async fn events(file: Option<&Path>) -> Result<(), SeedError> {
    let content = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading events from file");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SeedError::Read {
                    path: path.display().to_string(),
                    source,
                })?
        }
        None => SAMPLE_EVENTS.to_owned(),
    };

    // Validate everything before connecting
    let events = parse_events(&content)?;
    info!(count = events.len(), "Parsed events");

    let pool = connect().await?;
    let repo = EventRepository::new(&pool);

    for event in &events {
        let stored = repo.upsert_by_title(event).await?;
        info!(id = %stored.id, title = %stored.title, "Upserted event");
    }

    info!("Seeded {} events", events.len());
    Ok(())
}

/// Parse and validate a JSON array of events.
fn parse_events(content: &str) -> Result<Vec<NewEvent>, SeedError> {
    let fields: Vec<EventFields> = serde_json::from_str(content)?;

    fields
        .into_iter()
        .enumerate()
        .map(|(index, f)| NewEvent::from_fields(f).map_err(|source| SeedError::Invalid { index, source }))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_is_valid() {
        let events = parse_events(SAMPLE_EVENTS).unwrap();
        assert_eq!(events.len(), 8);

        let bootcamp = events
            .iter()
            .find(|e| e.title == "Web Development Bootcamp 2025")
            .unwrap();
        assert_eq!(bootcamp.capacity, Some(200));
        assert_eq!(bootcamp.date.to_rfc3339(), "2025-01-18T04:30:00+00:00");
    }

    #[test]
    fn test_sample_titles_are_unique() {
        let events = parse_events(SAMPLE_EVENTS).unwrap();
        let mut titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), events.len());
    }

    #[test]
    fn test_invalid_entry_is_reported_by_index() {
        let content = r#"[
            {"title":"A","description":"d","date":"2025-01-01","location":"L","imageUrl":"http://i"},
            {"title":"B","description":"d","date":"whenever","location":"L","imageUrl":"http://i"}
        ]"#;

        match parse_events(content) {
            Err(SeedError::Invalid { index, source }) => {
                assert_eq!(index, 1);
                assert_eq!(source.0, "Invalid date format");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(parse_events("{}"), Err(SeedError::Parse(_))));
    }
}
