//! Metrics capability for the note access service.
//!
//! The service emits telemetry through an injected [`MetricsSink`] rather
//! than process-wide globals, so tests can substitute [`RecordingSink`] and
//! observe exactly what the service recorded. The server wires in an
//! exporter-backed sink; exposition is not this crate's concern.

use std::sync::Mutex;
use std::time::Duration;

use dashmap::DashMap;

/// Metric names emitted by the note access service.
pub mod names {
    /// Cache hits on the notes-list read path.
    pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
    /// Cache misses on the notes-list read path.
    pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";
    /// Wall-clock duration of each service operation.
    pub const REQUEST_DURATION_SECONDS: &str = "request_duration_seconds";
}

/// Receiver for counter increments and duration observations.
pub trait MetricsSink: Send + Sync {
    /// Increments a named counter by one.
    fn increment(&self, counter: &'static str);

    /// Records one duration observation under a named histogram.
    fn observe(&self, histogram: &'static str, duration: Duration);
}

/// A sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn increment(&self, _counter: &'static str) {}

    fn observe(&self, _histogram: &'static str, _duration: Duration) {}
}

/// A sink that records everything, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    counters: DashMap<&'static str, u64>,
    observations: Mutex<Vec<(&'static str, Duration)>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter (zero when never incremented).
    #[must_use]
    pub fn count(&self, counter: &str) -> u64 {
        self.counters.get(counter).map(|v| *v).unwrap_or(0)
    }

    /// Number of observations recorded under a histogram.
    #[must_use]
    pub fn observation_count(&self, histogram: &str) -> usize {
        self.observations
            .lock()
            .map(|obs| obs.iter().filter(|(name, _)| *name == histogram).count())
            .unwrap_or(0)
    }
}

impl MetricsSink for RecordingSink {
    fn increment(&self, counter: &'static str) {
        *self.counters.entry(counter).or_insert(0) += 1;
    }

    fn observe(&self, histogram: &'static str, duration: Duration) {
        if let Ok(mut obs) = self.observations.lock() {
            obs.push((histogram, duration));
        }
    }
}
