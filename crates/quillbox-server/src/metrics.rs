//! Prometheus metrics for the Quillbox server.
//!
//! Installs the Prometheus recorder at startup, renders the exposition text
//! for the `/metrics` endpoint, and adapts the `metrics` facade to the
//! `MetricsSink` capability the note access service is constructed with.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

use quillbox_notes::MetricsSink;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics exporter.
///
/// This should be called once at server startup.
/// Returns `true` if initialization succeeded, `false` if already initialized.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        tracing::debug!("Prometheus metrics already initialized");
        return false;
    }

    // Use install_recorder() for pull-based metrics (we serve /metrics ourselves)
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROMETHEUS_HANDLE.set(handle).is_err() {
                tracing::warn!("Failed to store Prometheus handle (already set)");
                return false;
            }

            tracing::info!("Prometheus metrics initialized");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            false
        }
    }
}

/// Render all metrics in Prometheus text format.
///
/// Returns `None` if metrics were not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|handle| handle.render())
}

/// Forwards the note access service's telemetry to the `metrics` facade.
///
/// The service itself only knows the `MetricsSink` capability; this adapter
/// is what production wiring injects. Tests inject a recording sink instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetrySink;

impl MetricsSink for TelemetrySink {
    fn increment(&self, name: &'static str) {
        counter!(name).increment(1);
    }

    fn observe(&self, name: &'static str, duration: Duration) {
        histogram!(name).record(duration.as_secs_f64());
    }
}
