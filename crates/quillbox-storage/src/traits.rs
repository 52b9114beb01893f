//! Storage traits for the storage abstraction layer.
//!
//! These are the ports the note access service and the auth service talk to.
//! Implementations must be thread-safe (`Send + Sync`).

use async_trait::async_trait;

use quillbox_core::{Note, NoteDraft, NoteId, TagFilter, User, UserId};

use crate::error::StorageError;

/// Persistent store for notes.
///
/// The store is the sole source of truth. Ownership checks are the caller's
/// responsibility: `find_by_id` returns the note regardless of owner so the
/// service layer can apply its not-found policy uniformly.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persists a new note owned by `owner` and returns it with its assigned
    /// identity and timestamps.
    async fn insert(&self, owner: UserId, draft: NoteDraft) -> Result<Note, StorageError>;

    /// Fetches a note by identity.
    ///
    /// Returns `None` if the note does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing
    /// notes.
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, StorageError>;

    /// Persists the full state of an existing note.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the note does not exist.
    async fn save(&self, note: &Note) -> Result<Note, StorageError>;

    /// Deletes a note by identity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the note does not exist.
    async fn delete(&self, id: NoteId) -> Result<(), StorageError>;

    /// Lists all notes owned by `owner` that satisfy `filter`.
    ///
    /// Each filter token must appear as a substring of a note's comma-joined
    /// tag list; tokens are AND-combined. The empty filter matches every
    /// note of the owner. Results are ordered by note identity.
    async fn list_by_owner(
        &self,
        owner: UserId,
        filter: &TagFilter,
    ) -> Result<Vec<Note>, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Persistent store for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` when the email is taken.
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, StorageError>;

    /// Fetches a user by email. Returns `None` if no such user exists.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Fetches a user by identity. Returns `None` if no such user exists.
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StorageError>;
}

// Ensure traits are object-safe by using them as trait objects
#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that NoteStore is object-safe
    fn _assert_note_store_object_safe(_: &dyn NoteStore) {}

    // Compile-time test that UserStore is object-safe
    fn _assert_user_store_object_safe(_: &dyn UserStore) {}
}
