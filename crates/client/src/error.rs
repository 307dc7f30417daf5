//! Client error types.

use thiserror::Error;

use event_desk_core::ApiMessage;

/// Errors returned by [`EventDeskClient`](crate::EventDeskClient) calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or an undecodable success body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the error body, or the raw body.
        message: String,
    },

    /// The base URL could not be used to build request URLs.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Build an `Api` error from a status code and raw response body.
    #[must_use]
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiMessage>(body)
            .map(|m| m.message)
            .unwrap_or_else(|_| body.trim().to_owned());

        Self::Api { status, message }
    }

    /// HTTP status of an `Api` error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_body() {
        let err = ClientError::from_body(409, r#"{"message":"You have already registered for this event"}"#);
        assert_eq!(err.status(), Some(409));
        assert_eq!(
            err.to_string(),
            "API error (409): You have already registered for this event"
        );
    }

    #[test]
    fn test_from_plain_body() {
        let err = ClientError::from_body(502, " Bad Gateway\n");
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
