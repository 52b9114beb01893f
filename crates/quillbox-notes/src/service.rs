//! The note access service: cache-aside reads and write-triggered
//! invalidation.
//!
//! ## Cache key scheme
//!
//! `user:{owner}:tags:{raw_filter}` — one entry per (owner, raw filter
//! string), with the empty filter producing the owner's *base key*.
//! Invalidation deletes only the base key, so it needs nothing but the owner
//! identity; tag-filtered entries are not explicitly invalidated and age out
//! via TTL. Writes therefore guarantee read-after-write only for unfiltered
//! reads; filtered reads may serve data up to one TTL window old.

use std::sync::Arc;
use std::time::{Duration, Instant};

use quillbox_cache::Cache;
use quillbox_core::{Note, NoteChanges, NoteDraft, NoteId, TagFilter, UserId};
use quillbox_storage::NoteStore;

use crate::error::NotesError;
use crate::metrics::{MetricsSink, names};

/// Time-to-live for cached notes lists.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Mediates all reads and writes of notes.
///
/// Stateless across calls apart from the injected store, cache, and metrics
/// capabilities; each operation is request-scoped. No locks protect the
/// cache-aside sequence: two concurrent reads may both miss and both fill
/// the cache, which is harmless since their values are equivalent at that
/// instant.
pub struct NotesService {
    store: Arc<dyn NoteStore>,
    cache: Arc<dyn Cache>,
    metrics: Arc<dyn MetricsSink>,
    cache_ttl: Duration,
}

impl NotesService {
    /// Creates a service over the given capabilities with the default TTL.
    pub fn new(
        store: Arc<dyn NoteStore>,
        cache: Arc<dyn Cache>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            store,
            cache,
            metrics,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Sets the cache TTL.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Derives the cache key for an owner and a raw tag-filter string.
    ///
    /// The empty filter yields the base key, which is also the only key the
    /// invalidation path touches.
    fn cache_key(owner: UserId, raw_filter: &str) -> String {
        format!("user:{owner}:tags:{raw_filter}")
    }

    /// Deletes the owner's base cache entry. Best-effort: a cache failure
    /// here must never fail the surrounding write.
    async fn invalidate(&self, owner: UserId) {
        let key = Self::cache_key(owner, "");
        if let Err(e) = self.cache.delete(&key).await {
            tracing::warn!(key = %key, error = %e, "cache invalidation failed");
        }
    }

    /// Creates a note owned by `owner`.
    pub async fn create(&self, owner: UserId, draft: NoteDraft) -> Result<Note, NotesError> {
        let started = Instant::now();

        let note = self.store.insert(owner, draft).await?;
        self.invalidate(owner).await;

        self.metrics
            .observe(names::REQUEST_DURATION_SECONDS, started.elapsed());
        Ok(note)
    }

    /// Applies a partial update to a note.
    ///
    /// # Errors
    ///
    /// `NotesError::NotFound` when the note does not exist or belongs to a
    /// different owner; the two cases are indistinguishable to the caller.
    pub async fn update(
        &self,
        owner: UserId,
        id: NoteId,
        changes: NoteChanges,
    ) -> Result<Note, NotesError> {
        let started = Instant::now();

        let mut note = self.owned_note(owner, id).await?;
        changes.apply_to(&mut note);
        let saved = self.store.save(&note).await?;
        self.invalidate(owner).await;

        self.metrics
            .observe(names::REQUEST_DURATION_SECONDS, started.elapsed());
        Ok(saved)
    }

    /// Deletes a note.
    ///
    /// # Errors
    ///
    /// Same not-found policy as [`NotesService::update`].
    pub async fn remove(&self, owner: UserId, id: NoteId) -> Result<(), NotesError> {
        let started = Instant::now();

        let note = self.owned_note(owner, id).await?;
        self.store.delete(note.id).await?;
        self.invalidate(owner).await;

        self.metrics
            .observe(names::REQUEST_DURATION_SECONDS, started.elapsed());
        Ok(())
    }

    /// Lists the owner's notes, optionally restricted by a raw tag-filter
    /// string (comma-separated tokens, conjunctive substring match).
    ///
    /// Cache-aside: a fresh cache entry is served without touching the
    /// store; otherwise the store is queried and the result is written back
    /// under the computed key with the configured TTL. Cache failures in
    /// either direction are logged and treated as an empty cache.
    pub async fn find_all(
        &self,
        owner: UserId,
        tags: Option<&str>,
    ) -> Result<Vec<Note>, NotesError> {
        let started = Instant::now();

        let raw_filter = tags.unwrap_or("");
        let key = Self::cache_key(owner, raw_filter);

        if let Some(notes) = self.cache_lookup(&key).await {
            self.metrics.increment(names::CACHE_HITS_TOTAL);
            self.metrics
                .observe(names::REQUEST_DURATION_SECONDS, started.elapsed());
            return Ok(notes);
        }
        self.metrics.increment(names::CACHE_MISSES_TOTAL);

        let filter = TagFilter::parse(raw_filter);
        let notes = self.store.list_by_owner(owner, &filter).await?;

        match serde_json::to_string(&notes) {
            Ok(payload) => {
                if let Err(e) = self.cache.set(&key, &payload, self.cache_ttl).await {
                    tracing::warn!(key = %key, error = %e, "cache write failed");
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to encode notes list for cache");
            }
        }

        self.metrics
            .observe(names::REQUEST_DURATION_SECONDS, started.elapsed());
        Ok(notes)
    }

    /// Fetches the note and enforces ownership.
    async fn owned_note(&self, owner: UserId, id: NoteId) -> Result<Note, NotesError> {
        match self.store.find_by_id(id).await? {
            Some(note) if note.owner_id == owner => Ok(note),
            _ => Err(NotesError::not_found(id)),
        }
    }

    /// Cache read half of the protocol. Returns `None` on miss, on any
    /// cache failure, and on an undecodable payload (which is also
    /// best-effort evicted).
    async fn cache_lookup(&self, key: &str) -> Option<Vec<Note>> {
        let payload = match self.cache.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(notes) => Some(notes),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to decode cached notes list");
                if let Err(e) = self.cache.delete(key).await {
                    tracing::debug!(key = %key, error = %e, "failed to evict bad cache entry");
                }
                None
            }
        }
    }
}
