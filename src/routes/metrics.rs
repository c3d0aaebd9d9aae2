//! Prometheus metrics endpoint
//!
//! Exposes generation metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// Global Prometheus handle, set once the recorder is installed
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder (call once at startup)
pub fn init_metrics() -> anyhow::Result<()> {
    PROMETHEUS_HANDLE.get_or_try_init(|| PrometheusBuilder::new().install_recorder())?;
    register_metrics();
    Ok(())
}

fn register_metrics() {
    metrics::describe_counter!(
        "sketchgen_generations_total",
        "Generations finished, by provider and outcome"
    );
    metrics::describe_counter!(
        "sketchgen_fragments_total",
        "Text fragments relayed to clients"
    );
    metrics::describe_counter!(
        "sketchgen_rejected_requests_total",
        "Generate requests rejected before streaming"
    );
    metrics::describe_histogram!(
        "sketchgen_generation_duration_seconds",
        "Generation duration in seconds"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping. Empty when the
/// recorder was never installed.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

/// Record a finished generation
pub fn record_generation(provider: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "sketchgen_generations_total",
        "provider" => provider.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("sketchgen_generation_duration_seconds", "provider" => provider.to_string())
        .record(duration_secs);
}

/// Record fragments relayed for one generation
pub fn record_fragments(provider: &str, count: u64) {
    metrics::counter!("sketchgen_fragments_total", "provider" => provider.to_string())
        .increment(count);
}

/// Record a request rejected before a stream was opened
pub fn record_rejection(reason: &str) {
    metrics::counter!("sketchgen_rejected_requests_total", "reason" => reason.to_string())
        .increment(1);
}
