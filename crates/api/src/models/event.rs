//! Validated event inputs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use event_desk_core::EventFields;

use super::ValidationError;

pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Title, description, date, location, and imageUrl are required";
pub const INVALID_DATE_MESSAGE: &str = "Invalid date format";
pub const INVALID_CAPACITY_MESSAGE: &str = "Capacity must be a positive integer";

/// Naive layouts accepted in addition to RFC 3339. Read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A fully specified event, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: Option<i32>,
    pub image_url: String,
}

impl NewEvent {
    /// Validate a create request.
    ///
    /// All text fields must be present and non-blank, the date must parse and
    /// capacity, when given, must be positive. An explicit `null` capacity
    /// means "no limit".
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` describing the first problem found.
    pub fn from_fields(fields: EventFields) -> Result<Self, ValidationError> {
        let (Some(title), Some(description), Some(date), Some(location), Some(image_url)) = (
            non_blank(fields.title),
            non_blank(fields.description),
            non_blank(fields.date),
            non_blank(fields.location),
            non_blank(fields.image_url),
        ) else {
            return Err(ValidationError::new(REQUIRED_FIELDS_MESSAGE));
        };

        let capacity = fields.capacity.flatten();
        check_capacity(capacity)?;

        Ok(Self {
            title,
            description,
            date: parse_event_date(&date)?,
            location,
            capacity,
            image_url,
        })
    }
}

/// A partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    /// `Some(None)` clears the capacity.
    pub capacity: Option<Option<i32>>,
    pub image_url: Option<String>,
}

impl EventChanges {
    /// Validate an update request.
    ///
    /// Present text fields must be non-blank; a present date must parse.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` describing the first problem found.
    pub fn from_fields(fields: EventFields) -> Result<Self, ValidationError> {
        let date = fields
            .date
            .map(|raw| parse_event_date(&raw))
            .transpose()?;

        if let Some(capacity) = fields.capacity {
            check_capacity(capacity)?;
        }

        Ok(Self {
            title: present_text("title", fields.title)?,
            description: present_text("description", fields.description)?,
            date,
            location: present_text("location", fields.location)?,
            capacity: fields.capacity,
            image_url: present_text("imageUrl", fields.image_url)?,
        })
    }

    /// Whether the update touches no column.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.capacity.is_none()
            && self.image_url.is_none()
    }
}

/// Parse an event date.
///
/// Accepts RFC 3339 (`2025-01-01T00:00:00Z`), naive date-times such as the
/// `2025-01-18T10:00` produced by HTML `datetime-local` inputs, and bare
/// dates. Naive values are taken as UTC.
///
/// # Errors
///
/// Returns `ValidationError` with "Invalid date format" if nothing matches.
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::new(INVALID_DATE_MESSAGE))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn present_text(field: &str, value: Option<String>) -> Result<Option<String>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) => non_blank(Some(v))
            .map(Some)
            .ok_or_else(|| ValidationError::new(format!("{field} cannot be empty"))),
    }
}

fn check_capacity(capacity: Option<i32>) -> Result<(), ValidationError> {
    match capacity {
        Some(n) if n <= 0 => Err(ValidationError::new(INVALID_CAPACITY_MESSAGE)),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn conf_fields() -> EventFields {
        EventFields {
            title: Some("Conf".to_owned()),
            description: Some("d".to_owned()),
            date: Some("2025-01-01T00:00:00Z".to_owned()),
            location: Some("L".to_owned()),
            capacity: None,
            image_url: Some("http://i".to_owned()),
        }
    }

    #[test]
    fn test_new_event_valid() {
        let event = NewEvent::from_fields(conf_fields()).unwrap();
        assert_eq!(event.title, "Conf");
        assert_eq!(event.date.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(event.capacity, None);
    }

    #[test]
    fn test_new_event_missing_each_required_field() {
        let strip: [fn(&mut EventFields); 5] = [
            |f: &mut EventFields| f.title = None,
            |f: &mut EventFields| f.description = None,
            |f: &mut EventFields| f.date = None,
            |f: &mut EventFields| f.location = None,
            |f: &mut EventFields| f.image_url = None,
        ];

        for remove in strip {
            let mut fields = conf_fields();
            remove(&mut fields);
            let err = NewEvent::from_fields(fields).unwrap_err();
            assert_eq!(err.0, REQUIRED_FIELDS_MESSAGE);
        }
    }

    #[test]
    fn test_new_event_blank_title_is_missing() {
        let fields = EventFields {
            title: Some("   ".to_owned()),
            ..conf_fields()
        };
        assert_eq!(
            NewEvent::from_fields(fields).unwrap_err().0,
            REQUIRED_FIELDS_MESSAGE
        );
    }

    #[test]
    fn test_new_event_bad_date() {
        let fields = EventFields {
            date: Some("next tuesday".to_owned()),
            ..conf_fields()
        };
        assert_eq!(
            NewEvent::from_fields(fields).unwrap_err().0,
            INVALID_DATE_MESSAGE
        );
    }

    #[test]
    fn test_new_event_capacity() {
        let with_capacity = EventFields {
            capacity: Some(Some(200)),
            ..conf_fields()
        };
        assert_eq!(
            NewEvent::from_fields(with_capacity).unwrap().capacity,
            Some(200)
        );

        let null_capacity = EventFields {
            capacity: Some(None),
            ..conf_fields()
        };
        assert_eq!(NewEvent::from_fields(null_capacity).unwrap().capacity, None);

        let zero = EventFields {
            capacity: Some(Some(0)),
            ..conf_fields()
        };
        assert_eq!(
            NewEvent::from_fields(zero).unwrap_err().0,
            INVALID_CAPACITY_MESSAGE
        );
    }

    #[test]
    fn test_changes_only_location() {
        let changes = EventChanges::from_fields(EventFields {
            location: Some("Y".to_owned()),
            ..EventFields::default()
        })
        .unwrap();

        assert_eq!(changes.location.as_deref(), Some("Y"));
        assert!(changes.title.is_none());
        assert!(changes.date.is_none());
        assert!(changes.capacity.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_changes_empty() {
        let changes = EventChanges::from_fields(EventFields::default()).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_changes_clear_capacity() {
        let changes = EventChanges::from_fields(EventFields {
            capacity: Some(None),
            ..EventFields::default()
        })
        .unwrap();
        assert_eq!(changes.capacity, Some(None));
    }

    #[test]
    fn test_changes_reject_blank_and_bad_values() {
        let blank = EventChanges::from_fields(EventFields {
            title: Some(String::new()),
            ..EventFields::default()
        });
        assert_eq!(blank.unwrap_err().0, "title cannot be empty");

        let bad_date = EventChanges::from_fields(EventFields {
            date: Some("2025-13-45".to_owned()),
            ..EventFields::default()
        });
        assert_eq!(bad_date.unwrap_err().0, INVALID_DATE_MESSAGE);

        let negative = EventChanges::from_fields(EventFields {
            capacity: Some(Some(-5)),
            ..EventFields::default()
        });
        assert_eq!(negative.unwrap_err().0, INVALID_CAPACITY_MESSAGE);
    }

    #[test]
    fn test_parse_event_date_formats() {
        let offset = parse_event_date("2025-01-18T10:00:00+05:30").unwrap();
        assert_eq!(offset.to_rfc3339(), "2025-01-18T04:30:00+00:00");

        let local_input = parse_event_date("2025-01-18T10:00").unwrap();
        assert_eq!(local_input.to_rfc3339(), "2025-01-18T10:00:00+00:00");

        let with_seconds = parse_event_date("2025-01-18T10:00:30.5").unwrap();
        assert_eq!(with_seconds.timestamp(), local_input.timestamp() + 30);

        let day = parse_event_date(" 2025-02-02 ").unwrap();
        assert_eq!(day.to_rfc3339(), "2025-02-02T00:00:00+00:00");

        assert!(parse_event_date("").is_err());
        assert!(parse_event_date("18/01/2025").is_err());
    }
}
