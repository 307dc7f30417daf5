//! Unified error handling for the API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use event_desk_core::ApiMessage;

use crate::db::RepositoryError;
use crate::models::ValidationError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
///
/// Every variant renders as `{"message": "..."}`. Server-side failures are
/// reported to Sentry and shown to the client as a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client input failed validation.
    #[error("Bad request: {0}")]
    Validation(String),

    /// Missing or unusable credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authentication service failure.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request collides with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[source] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_)
            | Self::Auth(AuthError::InvalidCredentials | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Auth(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_owned(),
            Self::Auth(AuthError::InvalidToken) => "Invalid or expired token".to_owned(),
            Self::Auth(_) | Self::Database(_) | Self::Internal(_) => {
                "Internal server error".to_owned()
            }
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::NotFound => Self::NotFound("Not found".to_owned()),
            other => Self::Database(other),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.0)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        (status, Json(ApiMessage::new(self.client_message()))).into_response()
    }
}

/// Set the Sentry user context from an authenticated admin.
pub fn set_sentry_user(admin_id: i32, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message: ApiMessage = serde_json::from_slice(&body).unwrap();
        (status, message.message)
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Event not found".to_owned());
        assert_eq!(err.to_string(), "Not found: Event not found");

        let err = AppError::Validation("Invalid date format".to_owned());
        assert_eq!(err.to_string(), "Bad request: Invalid date format");
    }

    #[tokio::test]
    async fn test_client_errors_keep_their_message() {
        assert_eq!(
            render(AppError::Validation("Name and email are required".to_owned())).await,
            (
                StatusCode::BAD_REQUEST,
                "Name and email are required".to_owned()
            )
        );
        assert_eq!(
            render(AppError::Unauthorized("Token missing".to_owned())).await,
            (StatusCode::UNAUTHORIZED, "Token missing".to_owned())
        );
        assert_eq!(
            render(AppError::NotFound("Event not found".to_owned())).await,
            (StatusCode::NOT_FOUND, "Event not found".to_owned())
        );
        assert_eq!(
            render(AppError::Conflict("dup".to_owned())).await,
            (StatusCode::CONFLICT, "dup".to_owned())
        );
    }

    #[tokio::test]
    async fn test_auth_errors() {
        assert_eq!(
            render(AuthError::InvalidCredentials.into()).await,
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_owned())
        );
        assert_eq!(
            render(AuthError::InvalidToken.into()).await,
            (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_owned()
            )
        );
        assert_eq!(
            render(AuthError::PasswordHash.into()).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned()
            )
        );
    }

    #[tokio::test]
    async fn test_server_errors_are_hidden() {
        let (status, message) = render(AppError::Internal("pool exhausted".to_owned())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");

        let err: AppError =
            RepositoryError::DataCorruption("bad row".to_owned()).into();
        let (status, message) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("bad row"));
    }

    #[test]
    fn test_repository_error_mapping() {
        let conflict: AppError = RepositoryError::Conflict("taken".to_owned()).into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let missing: AppError = RepositoryError::NotFound.into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let invalid: AppError = ValidationError::new("bad").into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.client_message(), "bad");
    }
}
