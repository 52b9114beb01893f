//! Error types for the note access service.

use quillbox_core::NoteId;
use quillbox_storage::StorageError;

/// Errors surfaced by the note access service.
///
/// There is no cache variant: cache failures are recovered inside the
/// service and never change an operation's outcome.
#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    /// The target note does not exist, or it belongs to a different owner.
    /// The two cases are deliberately indistinguishable so callers cannot
    /// probe for other users' note ids.
    #[error("Note not found: {id}")]
    NotFound {
        /// The note id the caller asked for.
        id: NoteId,
    },

    /// A persistent store failure. Fatal to the current operation.
    #[error(transparent)]
    Store(#[from] StorageError),
}

impl NotesError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(id: NoteId) -> Self {
        Self::NotFound { id }
    }

    /// Returns `true` if this error maps to a not-found rejection.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Store(e) => e.is_not_found(),
        }
    }
}
