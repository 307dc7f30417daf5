//! Bearer-token authentication for admin routes.
//!
//! [`require_admin`] runs in front of every admin route, verifies the token
//! and stores the [`CurrentAdmin`] in the request extensions. Handlers read it
//! back with the [`RequireAdminAuth`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentAdmin;
use crate::services::auth::AuthError;
use crate::state::AppState;

pub const HEADER_MISSING_MESSAGE: &str = "Authorization header missing";
pub const TOKEN_MISSING_MESSAGE: &str = "Token missing";

/// Middleware that rejects requests without a valid admin bearer token.
///
/// # Errors
///
/// Returns a 401 `AppError` if the header is absent, carries no token, or
/// the token fails verification.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let admin = state.tokens().verify(token)?;

    set_sentry_user(admin.id.as_i32(), Some(&admin.email));
    request.extensions_mut().insert(admin);

    Ok(next.run(request).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when the header or the token segment is
/// missing, and `AuthError::InvalidToken` for any other scheme or a header
/// that is not visible ASCII.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized(HEADER_MISSING_MESSAGE.to_owned()))?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let mut segments = value.split(' ');
    let scheme = segments.next().unwrap_or_default();
    let token = segments
        .next()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized(TOKEN_MISSING_MESSAGE.to_owned()))?;

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::InvalidToken.into());
    }

    Ok(token)
}

/// Extractor for the admin authenticated by [`require_admin`].
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAdmin>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized(HEADER_MISSING_MESSAGE.to_owned()))
    }
}
