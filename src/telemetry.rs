//! Structured logging and metrics bootstrap.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global `tracing` subscriber.
///
/// Respects `RUST_LOG` (defaulting to `info`); emits JSON when `SOAR_ENV`-style
/// `TRAILGUARD_ENV=production` is set, pretty/compact text otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let is_production = std::env::var("TRAILGUARD_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if is_production {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Install the process-wide Prometheus recorder with histogram buckets tuned
/// for the orchestrator's sub-30s request lifecycle.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            metrics_exporter_prometheus::Matcher::Full(
                "analyze_request_duration_seconds".to_string(),
            ),
            &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0],
        )
        .expect("failed to configure analyze_request_duration_seconds buckets")
        .set_buckets_for_metric(
            metrics_exporter_prometheus::Matcher::Full("adapter_duration_seconds".to_string()),
            &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )
        .expect("failed to configure adapter_duration_seconds buckets")
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}
