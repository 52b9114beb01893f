//! Cache backends: Redis, local in-process, and disabled.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use redis::AsyncCommands;

use crate::config::RedisConfig;
use crate::error::CacheError;

/// The volatile cache capability.
///
/// Values are opaque strings with a per-entry time-to-live; an entry may be
/// silently absent at any time without that being an error. Implementations
/// must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait Cache: Send + Sync {
    /// Looks up a value. Returns `None` for missing or expired entries.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores a value under `key` for at most `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Removes a value. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Returns the name of this cache backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Redis backend
// ---------------------------------------------------------------------------

/// Redis-backed cache using a deadpool connection pool.
#[derive(Clone)]
pub struct RedisCache {
    pool: deadpool_redis::Pool,
}

impl RedisCache {
    /// Creates a Redis cache from configuration.
    ///
    /// Pool construction does not eagerly connect; an unreachable backend
    /// shows up as `CacheError::Connection` on first use, which callers
    /// treat as a miss.
    pub fn new(config: &RedisConfig) -> Result<Self, CacheError> {
        let mut cfg = deadpool_redis::Config::from_url(&config.url);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size));
        let pool = cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| CacheError::connection(e.to_string()))?;
        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::connection(e.to_string()))
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(|e| CacheError::backend(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

// ---------------------------------------------------------------------------
// Local backend
// ---------------------------------------------------------------------------

/// A cached entry with TTL support.
#[derive(Debug, Clone)]
struct CachedEntry {
    value: String,
    cached_at: Instant,
    ttl: Duration,
}

impl CachedEntry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Check if this entry has expired.
    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// In-process cache backed by a `DashMap`.
///
/// Single-instance deployments and the test suites use this backend; it
/// never fails.
#[derive(Debug, Default)]
pub struct LocalCache {
    entries: DashMap<String, CachedEntry>,
}

impl LocalCache {
    /// Creates an empty local cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of live entries, counting expired-but-unreaped ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Cache for LocalCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value.clone()));
            }
            // Reap expired entry
            drop(entry);
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .insert(key.to_string(), CachedEntry::new(value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

// ---------------------------------------------------------------------------
// Disabled backend
// ---------------------------------------------------------------------------

/// A cache that caches nothing.
///
/// Selected at construction when caching is turned off, so consumers never
/// hold a nullable cache field. Every lookup misses; writes and deletes
/// succeed and do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

impl DisabledCache {
    /// Creates the disabled cache.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Cache for DisabledCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that Cache is object-safe
    fn _assert_cache_object_safe(_: &dyn Cache) {}

    #[tokio::test]
    async fn local_cache_round_trip() {
        let cache = LocalCache::new();
        cache
            .set("k", "v", Duration::from_secs(30))
            .await
            .expect("set");

        assert_eq!(cache.get("k").await.expect("get").as_deref(), Some("v"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn local_cache_expires_entries() {
        let cache = LocalCache::new();
        cache
            .set("k", "v", Duration::from_millis(1))
            .await
            .expect("set");

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.get("k").await.expect("get").is_none());
        // Reaped on lookup
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn local_cache_delete_removes_entry() {
        let cache = LocalCache::new();
        cache
            .set("k", "v", Duration::from_secs(30))
            .await
            .expect("set");
        cache.delete("k").await.expect("delete");

        assert!(cache.get("k").await.expect("get").is_none());
        // Deleting a missing key is fine
        cache.delete("k").await.expect("delete");
    }

    #[tokio::test]
    async fn disabled_cache_never_stores() {
        let cache = DisabledCache::new();
        cache
            .set("k", "v", Duration::from_secs(30))
            .await
            .expect("set");

        assert!(cache.get("k").await.expect("get").is_none());
        assert_eq!(cache.backend_name(), "disabled");
    }
}
