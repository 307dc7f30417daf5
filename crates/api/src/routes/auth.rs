//! Admin login route.

use axum::{Json, Router, extract::State, routing::post};
use serde_json::Value;

use event_desk_core::LoginResponse;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::models::CurrentAdmin;
use crate::services::auth::AuthService;
use crate::state::AppState;

pub const CREDENTIALS_REQUIRED_MESSAGE: &str = "Email and password are required";

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/login", post(login))
}

/// Exchange admin credentials for a bearer token.
///
/// POST /admin/login
async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = credentials(&body)?;

    let admin = AuthService::new(state.pool()).login(email, password).await?;
    let current = CurrentAdmin::from(&admin);
    let token = state.tokens().issue(&current)?;

    tracing::info!(admin_id = %current.id, "Admin logged in");

    Ok(Json(LoginResponse { token }))
}

/// Both fields must be non-empty strings.
fn credentials(body: &Value) -> Result<(&str, &str), AppError> {
    let field = |name: &str| body.get(name).and_then(Value::as_str).filter(|s| !s.is_empty());

    match (field("email"), field("password")) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(AppError::Validation(CREDENTIALS_REQUIRED_MESSAGE.to_owned())),
    }
}
