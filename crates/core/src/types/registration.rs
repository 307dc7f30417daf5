//! Registration types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::id::{EventId, RegistrationId};

/// One person's registration for one event.
///
/// At most one registration exists per `(email, event_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub event_id: EventId,
    pub created_at: DateTime<Utc>,
}

/// A registration joined with the event it belongs to (admin view).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationWithEvent {
    #[serde(flatten)]
    pub registration: Registration,
    pub event: Event,
}

/// Public registration form body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_with_event_is_flattened() {
        let ts: DateTime<Utc> = "2025-01-01T00:00:00Z".parse().unwrap();
        let row = RegistrationWithEvent {
            registration: Registration {
                id: RegistrationId::new(3),
                name: "Bob".to_owned(),
                email: "b@x.com".to_owned(),
                phone: None,
                event_id: EventId::new(1),
                created_at: ts,
            },
            event: Event {
                id: EventId::new(1),
                title: "Conf".to_owned(),
                description: "d".to_owned(),
                date: ts,
                location: "L".to_owned(),
                capacity: Some(10),
                image_url: "http://i".to_owned(),
                created_at: ts,
                updated_at: ts,
            },
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["eventId"], 1);
        assert_eq!(json["name"], "Bob");
        assert_eq!(json["event"]["title"], "Conf");
        assert!(json.get("phone").is_none());

        let back: RegistrationWithEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_request_accepts_missing_fields() {
        let req: RegistrationRequest = serde_json::from_str(r#"{"name":"Bob"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Bob"));
        assert!(req.email.is_none());
    }
}
