//! Liveness and metrics-scrape endpoints (spec.md §7, ambient ops surface).

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde_json::json;

use super::AppState;

/// `GET /health` — always 200 while the process is accepting connections
/// (spec.md §6: `{"status": "healthy", "service": <name>, "version": <semver>}`).
/// `version` is the git-describe string `build.rs` emits via `vergen-git2`,
/// not the `Cargo.toml` placeholder (teacher: `actions/status.rs`'s own use
/// of `VERGEN_GIT_DESCRIBE`).
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("VERGEN_GIT_DESCRIBE"),
    }))
}

/// `GET /metrics` — Prometheus text exposition of everything recorded via
/// the `metrics` facade (adapter latencies, request durations, counters).
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics_handle.render()
}
