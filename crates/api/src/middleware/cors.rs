//! Cross-origin policy for the browser client.

use axum::http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE, InvalidHeaderValue},
};
use tower_http::cors::CorsLayer;

use crate::config::ApiConfig;

/// CORS layer allowing the configured web client origin.
///
/// # Errors
///
/// Returns `InvalidHeaderValue` if the origin is not a valid header value.
pub fn cors_layer(config: &ApiConfig) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = HeaderValue::from_str(&config.client_origin())?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}
