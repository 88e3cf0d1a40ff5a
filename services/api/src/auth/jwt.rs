//! Signed, time-limited bearer tokens.
//!
//! Access tokens are HS256 JWTs whose subject is the user's email. Expiry is
//! checked with zero leeway.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's email.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier.
    pub jti: String,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

/// Issue a token for `subject_email` that expires `ttl_minutes` from now.
pub fn issue_token(
    subject_email: &str,
    ttl_minutes: i64,
    config: &JwtConfig,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject_email.to_string(),
        exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Issue a token with the configured lifetime.
pub fn issue_access_token(subject_email: &str, config: &JwtConfig) -> Result<String, AuthError> {
    issue_token(subject_email, config.access_token_expiry_mins, config)
}

/// Verify signature and expiry, returning the embedded [`Claims`].
pub fn decode_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 30,
        }
    }

    #[test]
    fn issued_token_decodes_to_subject() {
        let config = test_config();
        let token = issue_access_token("ann@example.com", &config).unwrap();

        let claims = decode_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "ann@example.com");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let config = test_config();
        let token = issue_token("ann@example.com", -5, &config).unwrap();

        assert!(matches!(
            decode_token(&token, &config),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn foreign_secret_is_invalid() {
        let token = issue_access_token("ann@example.com", &test_config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            access_token_expiry_mins: 30,
        };

        assert!(matches!(
            decode_token(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            decode_token("not.a.jwt", &test_config()),
            Err(AuthError::InvalidToken)
        ));
    }
}
