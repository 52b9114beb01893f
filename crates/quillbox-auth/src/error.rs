//! Authentication error types.

use quillbox_storage::StorageError;

/// Errors that can occur during authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two cases are deliberately
    /// collapsed so login failures never reveal whether an account exists.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration attempted with an email that is already taken.
    #[error("Email already registered: {email}")]
    EmailTaken {
        /// The conflicting email address.
        email: String,
    },

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The token failed validation for any non-expiry reason.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of the validation failure.
        message: String,
    },

    /// Password hashing or verification failed.
    #[error("Password hashing error: {message}")]
    Hash {
        /// Description of the hashing failure.
        message: String,
    },

    /// A user store failure.
    #[error(transparent)]
    Store(#[from] StorageError),
}

impl AuthError {
    /// Creates a new `EmailTaken` error.
    #[must_use]
    pub fn email_taken(email: impl Into<String>) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Hash` error.
    #[must_use]
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }

    /// Returns `true` when the error should surface as an authentication
    /// rejection rather than a server fault.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::TokenExpired | Self::InvalidToken { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_predicate_covers_token_and_credential_failures() {
        assert!(AuthError::InvalidCredentials.is_unauthorized());
        assert!(AuthError::TokenExpired.is_unauthorized());
        assert!(AuthError::invalid_token("bad signature").is_unauthorized());
        assert!(!AuthError::email_taken("a@example.com").is_unauthorized());
    }
}
