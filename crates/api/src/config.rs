//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 4000)
//! - `CLIENT_BASE_URL` - Public URL of the web client, used as the CORS origin
//!   (default: <http://localhost:5173>)
//! - `TOKEN_TTL_HOURS` - Admin token lifetime in hours (default: 24)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use chrono::TimeDelta;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 30;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "dev-secret",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the web client
    pub client_base_url: Url,
    /// Admin token settings
    pub auth: AuthConfig,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Admin token configuration.
///
/// Implements `Debug` manually to redact the signing secret.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify admin tokens
    pub jwt_secret: SecretString,
    /// How long an issued token stays valid
    pub token_ttl: TimeDelta,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the signing secret fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(&EnvSource::process())
    }

    /// Load configuration from an explicit set of variables.
    ///
    /// # Errors
    ///
    /// Same as [`ApiConfig::from_env`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_source(&EnvSource::Map(vars))
    }

    fn from_source(env: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let database_url = SecretString::from(env.required("DATABASE_URL")?);
        let host = env
            .or_default("HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let client_base_url = parse_client_base_url(&env.or_default(
            "CLIENT_BASE_URL",
            "http://localhost:5173",
        ))?;

        let jwt_secret = SecretString::from(env.required("JWT_SECRET")?);
        validate_jwt_secret(&jwt_secret, "JWT_SECRET")?;
        let token_ttl = parse_token_ttl(env.optional("TOKEN_TTL_HOURS").as_deref())?;

        let json_logs = env
            .optional("LOG_FORMAT")
            .is_some_and(|format| format.eq_ignore_ascii_case("json"));
        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            database_url,
            host,
            port,
            client_base_url,
            auth: AuthConfig {
                jwt_secret,
                token_ttl,
            },
            json_logs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the web client's origin (`scheme://host[:port]`) for CORS.
    #[must_use]
    pub fn client_origin(&self) -> String {
        self.client_base_url.origin().ascii_serialization()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Where configuration values are read from.
enum EnvSource<'a> {
    Process,
    Map(&'a HashMap<String, String>),
}

impl EnvSource<'_> {
    const fn process() -> Self {
        Self::Process
    }

    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        let value = match self {
            Self::Process => std::env::var(key).ok(),
            Self::Map(vars) => vars.get(key).cloned(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Parse and check the client base URL.
fn parse_client_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("CLIENT_BASE_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "CLIENT_BASE_URL".to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }

    Ok(url)
}

/// Parse the token lifetime in hours.
fn parse_token_ttl(raw: Option<&str>) -> Result<TimeDelta, ConfigError> {
    let hours = match raw {
        Some(value) => value.trim().parse::<i64>().map_err(|e| {
            ConfigError::InvalidEnvVar("TOKEN_TTL_HOURS".to_string(), e.to_string())
        })?,
        None => DEFAULT_TOKEN_TTL_HOURS,
    };

    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::InvalidEnvVar(
            "TOKEN_TTL_HOURS".to_string(),
            format!("must be between 1 and {MAX_TOKEN_TTL_HOURS}"),
        ));
    }

    TimeDelta::try_hours(hours).ok_or_else(|| {
        ConfigError::InvalidEnvVar("TOKEN_TTL_HOURS".to_string(), "out of range".to_string())
    })
}

/// Validate length, placeholder patterns and entropy of the signing secret.
fn validate_jwt_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    validate_secret_strength(value, var_name)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GOOD_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn minimal() -> HashMap<String, String> {
        vars(&[
            ("DATABASE_URL", "postgres://localhost/event_desk"),
            ("JWT_SECRET", GOOD_SECRET),
        ])
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_vars(&minimal()).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:4000");
        assert_eq!(config.client_origin(), "http://localhost:5173");
        assert_eq!(config.auth.token_ttl, TimeDelta::hours(24));
        assert!(!config.json_logs);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_required() {
        let err = ApiConfig::from_vars(&vars(&[("JWT_SECRET", GOOD_SECRET)])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "DATABASE_URL"));

        let err = ApiConfig::from_vars(&vars(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "JWT_SECRET"));
    }

    #[test]
    fn test_overrides() {
        let mut env = minimal();
        env.insert("PORT".into(), "8080".into());
        env.insert("HOST".into(), "127.0.0.1".into());
        env.insert("CLIENT_BASE_URL".into(), "https://events.example.org/app/".into());
        env.insert("TOKEN_TTL_HOURS".into(), "2".into());
        env.insert("LOG_FORMAT".into(), "JSON".into());

        let config = ApiConfig::from_vars(&env).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.client_origin(), "https://events.example.org");
        assert_eq!(config.auth.token_ttl, TimeDelta::hours(2));
        assert!(config.json_logs);
    }

    #[test]
    fn test_invalid_port() {
        let mut env = minimal();
        env.insert("PORT".into(), "not-a-port".into());
        assert!(matches!(
            ApiConfig::from_vars(&env),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_invalid_client_base_url() {
        let mut env = minimal();
        env.insert("CLIENT_BASE_URL".into(), "mailto:someone@x.com".into());
        assert!(matches!(
            ApiConfig::from_vars(&env),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_token_ttl_bounds() {
        assert!(parse_token_ttl(Some("0")).is_err());
        assert!(parse_token_ttl(Some("721")).is_err());
        assert!(parse_token_ttl(Some("abc")).is_err());
        assert_eq!(parse_token_ttl(Some("720")).unwrap(), TimeDelta::hours(720));
    }

    #[test]
    fn test_jwt_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_jwt_secret(&secret, "JWT_SECRET").is_err());
    }

    #[test]
    fn test_jwt_secret_placeholder() {
        let secret = SecretString::from("dev-secret-key-dev-secret-key-dev-secret-key");
        let err = validate_jwt_secret(&secret, "JWT_SECRET").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_jwt_secret_low_entropy() {
        let secret = SecretString::from("a".repeat(40));
        assert!(validate_jwt_secret(&secret, "JWT_SECRET").is_err());
    }

    #[test]
    fn test_jwt_secret_valid() {
        let secret = SecretString::from(GOOD_SECRET);
        assert!(validate_jwt_secret(&secret, "JWT_SECRET").is_ok());
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ApiConfig::from_vars(&minimal()).unwrap();
        let debug = format!("{:?}", config.auth);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(GOOD_SECRET));
    }
}
