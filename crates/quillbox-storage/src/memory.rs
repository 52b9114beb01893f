//! In-memory storage backend.
//!
//! Used by the test suites and by local development without PostgreSQL.
//! Concurrent access goes through `DashMap`; note identities come from an
//! atomic counter so the backend matches the store-assigned-id contract of
//! the persistent backend.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use quillbox_core::{Note, NoteDraft, NoteId, TagFilter, User, UserId, now_utc};

use crate::error::StorageError;
use crate::traits::{NoteStore, UserStore};

/// In-memory implementation of [`NoteStore`] and [`UserStore`].
#[derive(Debug)]
pub struct InMemoryStore {
    notes: DashMap<NoteId, Note>,
    users: DashMap<UserId, User>,
    next_note_id: AtomicI64,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notes: DashMap::new(),
            users: DashMap::new(),
            next_note_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> NoteId {
        self.next_note_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of notes currently stored, across all owners.
    #[must_use]
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteStore for InMemoryStore {
    async fn insert(&self, owner: UserId, draft: NoteDraft) -> Result<Note, StorageError> {
        let now = now_utc();
        let note = Note {
            id: self.next_id(),
            owner_id: owner,
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, StorageError> {
        Ok(self.notes.get(&id).map(|entry| entry.clone()))
    }

    async fn save(&self, note: &Note) -> Result<Note, StorageError> {
        if !self.notes.contains_key(&note.id) {
            return Err(StorageError::not_found("note", note.id));
        }
        self.notes.insert(note.id, note.clone());
        Ok(note.clone())
    }

    async fn delete(&self, id: NoteId) -> Result<(), StorageError> {
        self.notes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("note", id))
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        filter: &TagFilter,
    ) -> Result<Vec<Note>, StorageError> {
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|entry| entry.owner_id == owner)
            .filter(|entry| filter.matches(&entry.joined_tags()))
            .map(|entry| entry.clone())
            .collect();
        notes.sort_by_key(|n| n.id);
        Ok(notes)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, StorageError> {
        let exists = self.users.iter().any(|entry| entry.email == email);
        if exists {
            return Err(StorageError::already_exists("user", email));
        }
        let user = User {
            id: quillbox_core::generate_user_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now_utc(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.clone()))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(self.users.get(&id).map(|entry| entry.clone()))
    }
}
