//! API types for the Quillbox notes server: request/response DTOs and the
//! HTTP error mapping.
//!
//! Request bodies are explicit structs with required vs. optional fields
//! validated at this boundary before anything reaches the core services.
//! Cache failures have no representation here at all: they are recovered
//! inside the note access service and can never surface to a caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quillbox_auth::AuthError;
use quillbox_core::{NoteChanges, NoteDraft};
use quillbox_notes::NotesError;
use quillbox_storage::StorageError;

// -------------------------
// Request bodies
// -------------------------

/// Body of `POST /api/notes`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateNoteRequest {
    /// Validates the body and converts it into a domain draft.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` when title or content is empty.
    pub fn into_draft(self) -> Result<NoteDraft, ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::bad_request("title must not be empty"));
        }
        if self.content.trim().is_empty() {
            return Err(ApiError::bad_request("content must not be empty"));
        }
        Ok(NoteDraft {
            title: self.title,
            content: self.content,
            tags: self.tags,
        })
    }
}

/// Body of `PUT /api/notes/{id}`. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateNoteRequest {
    /// Converts the body into domain changes.
    pub fn into_changes(self) -> NoteChanges {
        NoteChanges {
            title: self.title,
            content: self.content,
            tags: self.tags,
        }
    }
}

/// Body of `POST /api/auth/register` and `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl CredentialsRequest {
    /// Validates that both fields are present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` on empty email or password.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() {
            return Err(ApiError::bad_request("email must not be empty"));
        }
        if self.password.is_empty() {
            return Err(ApiError::bad_request("password must not be empty"));
        }
        Ok(())
    }
}

// -------------------------
// Response bodies
// -------------------------

/// Body returned by `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub id: String,
    pub email: String,
}

/// Body returned by `DELETE /api/notes/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// JSON error body: `{"error": "...", "message": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

// -------------------------
// Error mapping
// -------------------------

/// High-level API errors mapped to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error_code(),
            message: self.message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<NotesError> for ApiError {
    fn from(err: NotesError) -> Self {
        if err.is_not_found() {
            // The service collapses "missing" and "owned by someone else";
            // keep the message generic for the same reason.
            ApiError::not_found("note not found")
        } else {
            ApiError::internal(err.to_string())
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ApiError::not_found(err.to_string()),
            StorageError::AlreadyExists { .. } => ApiError::conflict(err.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken { .. } => ApiError::conflict(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken { .. } => ApiError::unauthorized(err.to_string()),
            AuthError::Store(e) => e.into(),
            AuthError::Hash { message } => ApiError::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_title_and_content() {
        let ok = CreateNoteRequest {
            title: "A".into(),
            content: "x".into(),
            tags: vec![],
        };
        assert!(ok.into_draft().is_ok());

        let no_title = CreateNoteRequest {
            title: "  ".into(),
            content: "x".into(),
            tags: vec![],
        };
        assert!(matches!(
            no_title.into_draft(),
            Err(ApiError::BadRequest(_))
        ));

        let no_content = CreateNoteRequest {
            title: "A".into(),
            content: "".into(),
            tags: vec![],
        };
        assert!(matches!(
            no_content.into_draft(),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn credentials_are_validated() {
        let ok = CredentialsRequest {
            email: "a@example.com".into(),
            password: "hunter2".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = CredentialsRequest {
            email: "".into(),
            password: "hunter2".into(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn not_found_policy_maps_to_404() {
        let err: ApiError = NotesError::not_found(7).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn ownership_blind_message_leaks_nothing() {
        let err: ApiError = NotesError::not_found(7).into();
        assert_eq!(err.message(), "note not found");
    }

    #[test]
    fn store_failures_map_to_500() {
        let err: ApiError = NotesError::Store(StorageError::internal("boom")).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map_by_kind() {
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err: ApiError = AuthError::email_taken("a@example.com").into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
