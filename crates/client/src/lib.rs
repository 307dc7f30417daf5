//! Typed HTTP client for the Event Desk API.
//!
//! Public calls (listing, event detail, registration) live on
//! [`EventDeskClient`]. Admin calls need a bearer token, so they live on the
//! [`AdminSession`] returned by [`EventDeskClient::login`].
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), event_desk_client::ClientError> {
//! use event_desk_client::EventDeskClient;
//!
//! let client = EventDeskClient::new("http://localhost:4000")?;
//! let events = client.list_events().await?;
//!
//! let admin = client.login("a@x.com", "p1").await?;
//! let registrations = admin.list_registrations().await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod error;

pub use error::ClientError;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;
use url::Url;

use event_desk_core::{
    Event, EventFields, EventId, LoginResponse, Registration, RegistrationRequest,
    RegistrationWithEvent,
};

/// Request timeout for every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the public API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct EventDeskClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    /// Always ends in `/api/`.
    api_base: Url,
}

impl std::fmt::Debug for EventDeskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDeskClient")
            .field("api_base", &self.inner.api_base.as_str())
            .finish_non_exhaustive()
    }
}

impl EventDeskClient {
    /// Create a client for the server at `base_url` (e.g. `http://localhost:4000`).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `base_url` is not an absolute URL,
    /// or `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_http_client(http, api_base(base_url)?))
    }

    fn with_http_client(http: reqwest::Client, api_base: Url) -> Self {
        Self {
            inner: Arc::new(ClientInner { http, api_base }),
        }
    }

    /// The `/api/` URL every request path is resolved against.
    #[must_use]
    pub fn api_base(&self) -> &Url {
        &self.inner.api_base
    }

    /// List all events, soonest first.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn list_events(&self) -> Result<Vec<Event>, ClientError> {
        self.send(self.request(Method::GET, "events")?).await
    }

    /// Get one event.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 404 if the event does not exist.
    #[instrument(skip(self))]
    pub async fn get_event(&self, id: EventId) -> Result<Event, ClientError> {
        self.send(self.request(Method::GET, &format!("events/{id}"))?)
            .await
    }

    /// Register for an event.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 400 (invalid form), 404 (unknown
    /// event) or 409 (already registered).
    #[instrument(skip(self, registration))]
    pub async fn register(
        &self,
        id: EventId,
        registration: &RegistrationRequest,
    ) -> Result<Registration, ClientError> {
        let request = self.request(Method::POST, &format!("events/{id}/register"))?;
        self.send_json(request, registration).await
    }

    /// Log in as an admin.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 401 for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminSession, ClientError> {
        #[derive(Serialize)]
        struct LoginBody<'a> {
            email: &'a str,
            password: &'a str,
        }

        let request = self.request(Method::POST, "admin/login")?;
        let response: LoginResponse = self
            .send_json(request, &LoginBody { email, password })
            .await?;

        Ok(AdminSession {
            client: self.clone(),
            token: SecretString::from(response.token),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.inner.api_base.join(path)?;
        Ok(self.inner.http.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(request.json(body)).await
    }
}

/// An authenticated admin: the client plus the bearer token from login.
#[derive(Clone)]
pub struct AdminSession {
    client: EventDeskClient,
    token: SecretString,
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("client", &self.client)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl AdminSession {
    /// Resume a session from a token obtained earlier.
    #[must_use]
    pub const fn from_token(client: EventDeskClient, token: SecretString) -> Self {
        Self { client, token }
    }

    /// The bearer token, for persisting the session.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Create an event.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 400 (invalid fields), 401
    /// (expired session) or 409 (duplicate title).
    #[instrument(skip(self, fields))]
    pub async fn create_event(&self, fields: &EventFields) -> Result<Event, ClientError> {
        let request = self.authorized(Method::POST, "admin/events")?;
        self.client.send_json(request, fields).await
    }

    /// Update the given fields of an event; omitted fields are kept.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 400, 401, 404 or 409.
    #[instrument(skip(self, fields))]
    pub async fn update_event(
        &self,
        id: EventId,
        fields: &EventFields,
    ) -> Result<Event, ClientError> {
        let request = self.authorized(Method::PUT, &format!("admin/events/{id}"))?;
        self.client.send_json(request, fields).await
    }

    /// Delete an event and its registrations.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 401 or 404.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: EventId) -> Result<(), ClientError> {
        let request = self.authorized(Method::DELETE, &format!("admin/events/{id}"))?;
        check(request.send().await?).await?;
        Ok(())
    }

    /// List all registrations with their events, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 401 if the session expired.
    #[instrument(skip(self))]
    pub async fn list_registrations(&self) -> Result<Vec<RegistrationWithEvent>, ClientError> {
        let request = self.authorized(Method::GET, "admin/registrations")?;
        self.client.send(request).await
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        Ok(self
            .client
            .request(method, path)?
            .bearer_auth(self.token.expose_secret()))
    }
}

/// Resolve `{base_url}/api/`, keeping any path prefix on the base.
fn api_base(base_url: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url.join("api/")?)
}

/// Pass success responses through; turn anything else into `ClientError::Api`.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "API request failed");
    Err(ClientError::from_body(status.as_u16(), &body))
}
