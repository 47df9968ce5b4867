use std::time::Duration;

use clap::Parser;
use google_maps::Client as GoogleMapsClient;
use tracing::{info, warn};
use trailguard::config::Config;
use trailguard::orchestrator::Clients;
use trailguard::{telemetry, web};

/// trailguard: outdoor-activity safety assessment service.
#[derive(Parser, Debug)]
#[command(name = "trailguard", about = "Outdoor-activity safety assessment API")]
struct Args {
    /// Override BIND_ADDR from the environment (e.g. "0.0.0.0:8080").
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let metrics_handle = telemetry::init_metrics();

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("failed to build HTTP client");

    let google_maps_client = match &config.google_maps_api_key {
        Some(api_key) => match GoogleMapsClient::try_new(api_key) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("failed to create Google Maps client, elevation will use the secondary provider only: {e}");
                None
            }
        },
        None => {
            info!("GOOGLE_MAPS_API_KEY not set, elevation will use the secondary provider only");
            None
        }
    };

    let clients = Clients {
        http: http_client,
        google_maps: google_maps_client,
    };

    let bind_addr = config.bind_addr.clone();
    let app = web::build_router(config, clients, metrics_handle);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));
    info!("trailguard listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

/// Waits for SIGINT (or, on Unix, SIGTERM) so in-flight requests drain before
/// the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received, draining in-flight requests");
}
