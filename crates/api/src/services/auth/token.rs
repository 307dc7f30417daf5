//! Signed admin bearer tokens (HS256 JWT).

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use event_desk_core::AdminId;

use super::AuthError;
use crate::config::AuthConfig;
use crate::models::CurrentAdmin;

/// JWT payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: AdminId,
    email: String,
    iat: i64,
    exp: i64,
}

/// Keys and policy for issuing and verifying admin tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenKeys {
    /// Build keys from the configured secret and lifetime.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: config.token_ttl,
        }
    }

    /// Token lifetime.
    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Issue a token for `admin`, valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue(&self, admin: &CurrentAdmin) -> Result<String, AuthError> {
        self.issue_at(admin, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue_at(
        &self,
        admin: &CurrentAdmin,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            id: admin.id,
            email: admin.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Check signature and expiry and return the admin the token names.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for any malformed, forged or expired
    /// token.
    pub fn verify(&self, token: &str) -> Result<CurrentAdmin, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AuthError::InvalidToken
        })?;

        Ok(CurrentAdmin {
            id: data.claims.id,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn keys(secret: &str, hours: i64) -> TokenKeys {
        TokenKeys::new(&AuthConfig {
            jwt_secret: SecretString::from(secret.to_owned()),
            token_ttl: TimeDelta::hours(hours),
        })
    }

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminId::new(7),
            email: "a@x.com".to_owned(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let keys = keys("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%", 24);
        let token = keys.issue(&admin()).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), admin());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = keys("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%", 1);
        let issued_at = Utc::now() - TimeDelta::hours(2);
        let token = keys.issue_at(&admin(), issued_at).unwrap();

        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let ours = keys("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%", 24);
        let theirs = keys("Zq8&Lw2!Vn5@Tx7#Ks1$Pm4^Hc9*Rd6%", 24);
        let token = theirs.issue(&admin()).unwrap();

        assert!(matches!(ours.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let keys = keys("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%", 24);
        assert!(matches!(keys.verify("not.a.jwt"), Err(AuthError::InvalidToken)));
        assert!(matches!(keys.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let keys = keys("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%", 24);
        assert!(!format!("{keys:?}").contains("aB3$"));
    }
}
