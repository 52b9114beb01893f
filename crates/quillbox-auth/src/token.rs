//! JWT issuance and validation.
//!
//! Access tokens are HS256-signed with a shared secret; claims carry the
//! user id as `sub` plus the email, issue time, and expiry.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use quillbox_core::User;

use crate::error::AuthError;

/// Claims carried by a Quillbox access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user id, as a uuid string.
    pub sub: String,
    /// The user's email at issue time.
    pub email: String,
    /// Issue time, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Encodes and validates access tokens.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_secs: u64,
}

impl JwtService {
    /// Creates a service signing with the given shared secret; issued tokens
    /// live for `token_ttl_secs`.
    #[must_use]
    pub fn new(secret: &str, token_ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            token_ttl_secs,
        }
    }

    /// Lifetime of issued tokens in seconds.
    #[must_use]
    pub fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_secs
    }

    /// Issues an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.token_ttl_secs as i64,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::invalid_token(e.to_string()))
    }

    /// Validates a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for expired tokens and
    /// `AuthError::InvalidToken` for every other validation failure.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::invalid_token(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillbox_core::{generate_user_id, now_utc};

    fn sample_user() -> User {
        User {
            id: generate_user_id(),
            email: "a@example.com".into(),
            password_hash: "irrelevant".into(),
            created_at: now_utc(),
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let jwt = JwtService::new("test-secret", 3600);
        let user = sample_user();

        let token = jwt.issue(&user).expect("issue");
        let claims = jwt.verify(&token).expect("verify");

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = JwtService::new("secret-a", 3600);
        let verifier = JwtService::new("secret-b", 3600);

        let token = issuer.issue(&sample_user()).expect("issue");
        let err = verifier.verify(&token).expect_err("must reject");
        assert!(matches!(err, AuthError::InvalidToken { .. }));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let jwt = JwtService::new("test-secret", 3600);
        let mut token = jwt.issue(&sample_user()).expect("issue");
        token.push('x');

        assert!(jwt.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let jwt = JwtService::new("test-secret", 3600);
        let user = sample_user();

        // Forge claims that expired well beyond the default leeway.
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("encode");

        let err = jwt.verify(&token).expect_err("must reject");
        assert!(matches!(err, AuthError::TokenExpired));
    }
}
