//! The user domain type.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Identifier for a user account.
pub type UserId = Uuid;

/// A registered user. The password is stored only as an argon2 PHC hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Argon2 PHC hash string, never the plaintext password.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Generates a fresh user id.
#[must_use]
pub fn generate_user_id() -> UserId {
    Uuid::new_v4()
}
