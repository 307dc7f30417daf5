//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! Paths are relative to the `/api` prefix the server nests them under.
//!
//! ```text
//! # Public
//! GET    /events                  - List events, soonest first
//! GET    /events/{id}             - Event detail
//! POST   /events/{id}/register    - Register for an event
//! POST   /admin/login             - Exchange credentials for a bearer token
//!
//! # Admin (Authorization: Bearer <token>)
//! POST   /admin/events            - Create event
//! PUT    /admin/events/{id}       - Partially update event
//! DELETE /admin/events/{id}       - Delete event and its registrations
//! GET    /admin/registrations     - All registrations with their events
//! ```

pub mod admin_events;
pub mod auth;
pub mod events;
pub mod registrations;

use axum::{Router, middleware};

use crate::middleware::require_admin;
use crate::state::AppState;

/// Build the API router.
///
/// `state` is needed up front to hang the bearer-token check on the admin
/// routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .merge(admin_events::router())
        .merge(registrations::admin_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(events::router())
        .merge(registrations::router())
        .merge(auth::router())
        .merge(admin)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use chrono::{TimeDelta, Utc};
    use tower::ServiceExt;

    use event_desk_core::{AdminId, ApiMessage};

    use super::*;
    use crate::config::ApiConfig;
    use crate::db::create_lazy_pool;
    use crate::models::CurrentAdmin;

    /// State whose pool never connects; only for requests that are rejected
    /// before any query runs.
    fn offline_state() -> AppState {
        let vars: HashMap<String, String> = [
            ("DATABASE_URL", "postgres://nobody@127.0.0.1:1/none"),
            ("JWT_SECRET", "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let config = ApiConfig::from_vars(&vars).unwrap();
        let pool = create_lazy_pool(&config.database_url).unwrap();
        AppState::new(config, pool)
    }

    fn app(state: &AppState) -> Router {
        routes(state).with_state(state.clone())
    }

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminId::new(1),
            email: "a@x.com".to_owned(),
        }
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message = serde_json::from_slice::<ApiMessage>(&bytes)
            .map(|m| m.message)
            .unwrap_or_default();
        (status, message)
    }

    #[tokio::test]
    async fn test_admin_routes_require_header() {
        let state = offline_state();

        for (method, uri) in [
            ("POST", "/admin/events"),
            ("PUT", "/admin/events/1"),
            ("DELETE", "/admin/events/1"),
            ("GET", "/admin/registrations"),
        ] {
            let (status, message) = send(&state, method, uri, None, Some("{}")).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(message, "Authorization header missing");
        }
    }

    #[tokio::test]
    async fn test_admin_routes_reject_bad_tokens() {
        let state = offline_state();

        let (status, message) =
            send(&state, "GET", "/admin/registrations", Some("Bearer"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Token missing");

        let (status, message) = send(
            &state,
            "GET",
            "/admin/registrations",
            Some("Bearer not-a-token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let state = offline_state();
        let issued_at = Utc::now() - state.tokens().ttl() - TimeDelta::minutes(1);
        let token = state.tokens().issue_at(&admin(), issued_at).unwrap();

        let (status, message) = send(
            &state,
            "DELETE",
            "/admin/events/1",
            Some(&format!("Bearer {token}")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_create_validation_runs_before_storage() {
        let state = offline_state();
        let token = state.tokens().issue(&admin()).unwrap();
        let auth = format!("Bearer {token}");

        let (status, message) = send(
            &state,
            "POST",
            "/admin/events",
            Some(&auth),
            Some(r#"{"title":"Conf"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            message,
            "Title, description, date, location, and imageUrl are required"
        );

        let (status, message) = send(
            &state,
            "POST",
            "/admin/events",
            Some(&auth),
            Some(
                r#"{"title":"Conf","description":"d","date":"soon","location":"L","imageUrl":"http://i"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Invalid date format");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let state = offline_state();
        let token = state.tokens().issue(&admin()).unwrap();

        let (status, message) = send(
            &state,
            "PUT",
            "/admin/events/1",
            Some(&format!("Bearer {token}")),
            Some("{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!message.is_empty());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let state = offline_state();

        let (status, message) = send(
            &state,
            "POST",
            "/events/1/register",
            None,
            Some(r#"{"name":"Bob"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Name and email are required");

        let (status, message) = send(
            &state,
            "POST",
            "/events/abc/register",
            None,
            Some(r#"{"name":"Bob","email":"b@x.com"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Invalid event id");
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let state = offline_state();

        let (status, message) = send(
            &state,
            "POST",
            "/admin/login",
            None,
            Some(r#"{"email":"a@x.com"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Email and password are required");
    }

    #[tokio::test]
    async fn test_non_numeric_event_id() {
        let state = offline_state();
        let (status, message) = send(&state, "GET", "/events/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Invalid event id");
    }
}
