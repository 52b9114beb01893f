//! Registration and login.

use std::sync::Arc;

use serde::Serialize;

use quillbox_core::User;
use quillbox_storage::{StorageError, UserStore};

use crate::error::AuthError;
use crate::password::{hash_password, verify_password};
use crate::token::{Claims, JwtService};

/// A successful login grant.
#[derive(Debug, Clone, Serialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Registration and login over a user store and a JWT signer.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtService,
}

impl AuthService {
    /// Creates the service.
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` when the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let password_hash = hash_password(password)?;
        match self.users.insert_user(email, &password_hash).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "user registered");
                Ok(user)
            }
            Err(StorageError::AlreadyExists { .. }) => Err(AuthError::email_taken(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// Exchanges credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password; the caller cannot tell which.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenGrant, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.jwt.issue(&user)?;
        Ok(TokenGrant {
            access_token,
            token_type: "Bearer",
            expires_in: self.jwt.token_ttl_secs(),
        })
    }

    /// Validates a bearer token; the HTTP middleware delegates here.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` or `AuthError::InvalidToken`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.jwt.verify(token)
    }
}
