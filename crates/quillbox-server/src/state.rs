//! Shared application state and the authenticated-user extension.

use std::sync::Arc;

use quillbox_auth::AuthService;
use quillbox_core::UserId;
use quillbox_notes::NotesService;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<NotesService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(notes: Arc<NotesService>, auth: Arc<AuthService>) -> Self {
        Self { notes, auth }
    }
}

/// The authenticated caller, inserted into request extensions by the auth
/// middleware after token validation.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}
