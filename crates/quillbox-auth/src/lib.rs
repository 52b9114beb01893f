//! Authentication for the Quillbox notes server.
//!
//! Covers credential storage (argon2 password hashing), token issuance and
//! validation (HS256 JWTs), and the register/login service the HTTP layer
//! delegates to.

pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use service::{AuthService, TokenGrant};
pub use token::{Claims, JwtService};
