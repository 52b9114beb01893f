//! Note access service.
//!
//! Single point of mediation between callers and note storage. Owns the
//! cache-aside read protocol, the per-owner cache-key scheme, write-path
//! invalidation, and hit/miss/duration telemetry.
//!
//! ## Failure isolation
//!
//! The persistent store is the authoritative path: its failures are fatal to
//! the current operation and propagate. The volatile cache is best-effort:
//! every cache failure is recovered locally and the operation proceeds as if
//! the cache were empty.

pub mod error;
pub mod metrics;
pub mod service;

pub use error::NotesError;
pub use metrics::{MetricsSink, NullSink, RecordingSink, names};
pub use service::{DEFAULT_CACHE_TTL, NotesService};
