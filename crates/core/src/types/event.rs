//! Event catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::EventId;

/// A scheduled activity open for public registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    /// Seat limit, if the organizer set one.
    pub capacity: Option<i32>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event fields as sent by a client when creating or updating an event.
///
/// Every field is optional on the wire so the API can report missing fields
/// itself. `capacity` keeps explicit presence: `None` means the field was
/// absent, `Some(None)` means it was sent as `null`.
///
/// ```
/// use event_desk_core::EventFields;
///
/// let absent: EventFields = serde_json::from_str(r#"{"location":"Y"}"#).unwrap();
/// assert_eq!(absent.capacity, None);
///
/// let cleared: EventFields = serde_json::from_str(r#"{"capacity":null}"#).unwrap();
/// assert_eq!(cleared.capacity, Some(None));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Event start as text; parsed server-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "presence"
    )]
    pub capacity: Option<Option<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Serde adapter distinguishing an absent field from an explicit `null`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub mod presence {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize the inner option; `None` should be skipped by the caller.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying serializer.
    #[allow(clippy::ref_option)]
    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize a present field, `null` included, as `Some(_)`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying deserializer.
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_camel_case() {
        let event = Event {
            id: EventId::new(1),
            title: "Conf".to_owned(),
            description: "d".to_owned(),
            date: "2025-01-01T00:00:00Z".parse().unwrap(),
            location: "L".to_owned(),
            capacity: None,
            image_url: "http://i".to_owned(),
            created_at: "2024-12-01T00:00:00Z".parse().unwrap(),
            updated_at: "2024-12-01T00:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["imageUrl"], "http://i");
        assert_eq!(json["capacity"], serde_json::Value::Null);
        assert_eq!(json["id"], 1);
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn test_fields_capacity_presence() {
        let set: EventFields = serde_json::from_str(r#"{"capacity": 50}"#).unwrap();
        assert_eq!(set.capacity, Some(Some(50)));

        let cleared: EventFields = serde_json::from_str(r#"{"capacity": null}"#).unwrap();
        assert_eq!(cleared.capacity, Some(None));

        let absent: EventFields = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.capacity, None);
    }

    #[test]
    fn test_fields_null_string_reads_as_absent() {
        let fields: EventFields = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(fields.title, None);
    }

    #[test]
    fn test_fields_serialize_skips_absent() {
        let fields = EventFields {
            location: Some("Y".to_owned()),
            capacity: Some(None),
            ..EventFields::default()
        };

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json, serde_json::json!({"location": "Y", "capacity": null}));
    }
}
