//! Volatile cache port and backends.
//!
//! The cache is an optional accelerator, never authoritative. Every backend
//! implements the same [`Cache`] capability trait; consumers that must
//! tolerate an absent cache select [`DisabledCache`] at construction instead
//! of holding a nullable field.
//!
//! ## Graceful degradation
//!
//! Backends surface failures as [`CacheError`]; callers on the read/write
//! path are expected to log and proceed as if the cache were empty. A cache
//! failure never changes the correctness outcome of an operation, only its
//! latency.

pub mod backend;
pub mod config;
pub mod error;

pub use backend::{Cache, DisabledCache, LocalCache, RedisCache};
pub use config::RedisConfig;
pub use error::CacheError;
