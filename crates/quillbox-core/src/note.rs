//! The note domain type and its typed operation inputs.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::user::UserId;

/// Identifier for a note, assigned by the persistent store.
pub type NoteId = i64;

/// A note owned by exactly one user.
///
/// The persistent store is the sole source of truth for notes; cached copies
/// are best-effort mirrors and never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(rename = "ownerId")]
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    /// Ordered tag list, possibly empty. Persisted comma-joined.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Note {
    /// The comma-joined tag representation used for persistence and for the
    /// loose substring filter match.
    #[must_use]
    pub fn joined_tags(&self) -> String {
        self.tags.join(",")
    }
}

/// Input for creating a note. Title and content are required; tags default
/// to an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Partial update for a note. Each present field replaces the stored value;
/// absent fields keep their prior values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NoteChanges {
    /// Returns `true` when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }

    /// Applies the changes to a note in place, refreshing `updated_at`.
    pub fn apply_to(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
        note.updated_at = crate::time::now_utc();
    }
}
