//! HTTP-surface integration tests: bind the real router to an ephemeral
//! port and drive it with `reqwest`, the same way the unit-level adapter
//! tests stub wire payloads but at the boundary the operator actually sees.
//!
//! Full-pipeline scenarios (NYC good day, Beijing unhealthy, etc.) are
//! covered at the unit level in `scoring::aqi`, `scoring::risk`,
//! `scoring::checklist`, and `orchestrator` instead of here: exercising them
//! end-to-end would mean either hitting real upstream services from a test
//! suite (non-deterministic, network-dependent) or plumbing per-test base-URL
//! overrides through every adapter, which the adapters intentionally don't
//! expose (their endpoints are fixed constants, same as the teacher's own
//! hardcoded service URLs). What's left for this file is the part that's
//! genuinely network-isolated: request validation and the ambient endpoints.

use std::net::SocketAddr;
use std::sync::OnceLock;

use metrics_exporter_prometheus::PrometheusHandle;
use trailguard::config::Config;
use trailguard::orchestrator::Clients;
use trailguard::telemetry;
use trailguard::web;

/// The Prometheus recorder is a process-wide global that can only be
/// installed once; every test in this binary shares the same handle instead
/// of each calling `telemetry::init_metrics()` (which would panic on the
/// second call).
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

async fn spawn_test_server() -> SocketAddr {
    let mut config = Config::from_env();
    config.bind_addr = "127.0.0.1:0".to_string();

    let clients = Clients {
        http: reqwest::Client::new(),
        google_maps: None,
    };

    let metrics_handle = METRICS_HANDLE.get_or_init(telemetry::init_metrics).clone();
    let app = web::build_router(config, clients, metrics_handle);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().expect("listener has no local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    addr
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let addr = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("invalid JSON body");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "trailguard");
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    let addr = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn analyze_rejects_out_of_range_latitude() {
    let addr = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/api/analyze"))
        .json(&serde_json::json!({
            "activity": "hiking",
            "lat": 200.0,
            "lon": -73.9654,
            "duration_hours": 4,
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("invalid JSON body");
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn analyze_rejects_duration_above_72_hours() {
    let addr = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/api/analyze"))
        .json(&serde_json::json!({
            "activity": "hiking",
            "lat": 40.0,
            "lon": -105.0,
            "duration_hours": 200,
        }))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_rejects_malformed_json_body() {
    let addr = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/api/analyze"))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .expect("request failed");

    assert!(response.status().is_client_error());
}
