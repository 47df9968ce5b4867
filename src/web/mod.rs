//! HTTP surface: one analysis endpoint plus the ambient health/metrics pair
//! (spec.md §3, §7). Grounded on the teacher's `web.rs`/`metrics.rs` router
//! shape, trimmed to trailguard's single stateless endpoint — no database
//! pool, no embedded static assets, no WebSocket live-fix stream.

mod analyze;
mod health;

use std::time::Duration;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::orchestrator::Clients;

/// Request bodies are a handful of floats and a short activity string; 16 KiB
/// is generous headroom over anything a legitimate client would send.
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub clients: Clients,
    pub metrics_handle: PrometheusHandle,
}

pub fn build_router(config: Config, clients: Clients, metrics_handle: PrometheusHandle) -> Router {
    let cors = build_cors_layer(&config.allowed_origins);

    let state = AppState {
        config,
        clients,
        metrics_handle,
    };

    Router::new()
        .route("/api/analyze", post(analyze::analyze))
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Permissive when no origins are configured (spec.md doesn't mandate a
/// lockdown default); otherwise only the configured origins, reflecting the
/// common "CORS_ALLOWED_ORIGINS=a,b,c" deployment pattern.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allowed_origins_falls_back_to_permissive() {
        // CorsLayer has no introspection API; this just exercises the branch.
        let _layer = build_cors_layer(&[]);
    }

    #[test]
    fn invalid_origin_strings_are_dropped_not_panicking() {
        let origins = vec!["not a valid header value \u{0000}".to_string()];
        let _layer = build_cors_layer(&origins);
    }
}
