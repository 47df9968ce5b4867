//! Process-wide configuration, loaded once at startup from the environment.
//!
//! Credentials are immutable for the lifetime of the process and are never
//! logged or serialized. A missing optional credential degrades the
//! corresponding adapter to "always absent" rather than causing a startup
//! failure — only `BIND_ADDR` parsing and the like are hard requirements.

use std::env;
use std::time::Duration;

/// Earthdata-style username/password pair for the satellite subsetter.
#[derive(Clone)]
pub struct SatelliteCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SatelliteCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SatelliteCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    pub metrics_port: u16,
    pub allowed_origins: Vec<String>,

    /// Present only when both `EARTHDATA_USERNAME` and `EARTHDATA_PASSWORD`
    /// are set; absence degrades the satellite subsetter to always-absent.
    pub satellite_credentials: Option<SatelliteCredentials>,
    /// Optional API key for the ground-station measurement service.
    pub ground_station_api_key: Option<String>,
    /// Optional API key for the summary (text-generation) service.
    pub summary_api_key: Option<String>,
    /// Optional API key for the primary (Google Maps) elevation lookup;
    /// absence degrades elevation to the secondary provider only.
    pub google_maps_api_key: Option<String>,

    pub adapter_timeout: Duration,
    pub adapter_max_attempts: u32,
    pub adapter_retry_backoff: Duration,
    pub orchestrator_deadline: Duration,
    pub summary_budget: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("metrics_port", &self.metrics_port)
            .field("allowed_origins", &self.allowed_origins)
            .field("satellite_credentials", &self.satellite_credentials)
            .field(
                "ground_station_api_key",
                &self.ground_station_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "summary_api_key",
                &self.summary_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("adapter_timeout", &self.adapter_timeout)
            .field("adapter_max_attempts", &self.adapter_max_attempts)
            .field("adapter_retry_backoff", &self.adapter_retry_backoff)
            .field("orchestrator_deadline", &self.orchestrator_deadline)
            .field("summary_budget", &self.summary_budget)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables, applying the defaults
    /// from `spec.md` §4-§5 for everything not explicitly set.
    pub fn from_env() -> Self {
        let satellite_credentials = match (
            env::var("EARTHDATA_USERNAME").ok(),
            env::var("EARTHDATA_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(SatelliteCredentials { username, password })
            }
            _ => None,
        };

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            metrics_port: env::var("METRICS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(9090),
            allowed_origins,
            satellite_credentials,
            ground_station_api_key: env::var("GROUND_STATION_API_KEY").ok(),
            summary_api_key: env::var("SUMMARY_API_KEY").ok(),
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            adapter_timeout: Duration::from_secs(10),
            adapter_max_attempts: 3,
            adapter_retry_backoff: Duration::from_secs(1),
            orchestrator_deadline: Duration::from_secs(25),
            summary_budget: Duration::from_secs(5),
        }
    }
}
