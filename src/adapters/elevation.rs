//! Elevation adapter (spec.md §4.7): a primary Google Maps Elevation API
//! lookup, falling back to a secondary free elevation service on failure.
//! Terrain classification itself is strict elevation-band logic living in
//! `domain::terrain`.

use std::time::Duration;

use anyhow::{Context, anyhow};
use google_maps::{Client as GoogleMapsClient, LatLng};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::retry::with_retry;
use crate::domain::Terrain;

const SECONDARY_ENDPOINT: &str = "https://api.open-meteo.com/v1/elevation";

#[derive(Debug, Deserialize)]
struct SecondaryResponse {
    elevation: Vec<f64>,
}

/// `(google_client?, http_client, lat, lon) -> Option<Terrain>` (spec.md §4.7).
pub async fn fetch(
    google_client: Option<&GoogleMapsClient>,
    http_client: &Client,
    lat: f64,
    lon: f64,
    adapter_timeout: Duration,
    max_attempts: u32,
    backoff: Duration,
) -> Option<Terrain> {
    if let Some(google_client) = google_client
        && let Some(elevation_m) = with_retry("elevation.primary", max_attempts, adapter_timeout, backoff, || {
            fetch_primary(google_client, lat, lon)
        })
        .await
    {
        return Some(Terrain::from_elevation_m(elevation_m));
    }

    debug!("primary elevation lookup absent, falling back to secondary service");
    let elevation_m = with_retry("elevation.secondary", max_attempts, adapter_timeout, backoff, || {
        fetch_secondary(http_client, lat, lon)
    })
    .await?;

    Some(Terrain::from_elevation_m(elevation_m))
}

async fn fetch_primary(client: &GoogleMapsClient, lat: f64, lon: f64) -> anyhow::Result<i32> {
    let lat_decimal = Decimal::try_from(lat).context("latitude not representable as Decimal")?;
    let lon_decimal = Decimal::try_from(lon).context("longitude not representable as Decimal")?;
    let point = LatLng::try_from_dec(lat_decimal, lon_decimal)
        .map_err(|e| anyhow!("invalid coordinates for Google Maps elevation lookup: {e}"))?;

    let response = client
        .elevation()
        .for_positions(&[point])
        .execute()
        .await
        .context("Google Maps elevation request failed")?;

    response
        .results
        .first()
        .map(|r| r.elevation.round() as i32)
        .ok_or_else(|| anyhow!("no elevation results returned"))
}

async fn fetch_secondary(client: &Client, lat: f64, lon: f64) -> anyhow::Result<i32> {
    let response: SecondaryResponse = client
        .get(SECONDARY_ENDPOINT)
        .query(&[("latitude", lat.to_string()), ("longitude", lon.to_string())])
        .send()
        .await
        .context("secondary elevation request failed")?
        .error_for_status()
        .context("secondary elevation request returned non-success status")?
        .json()
        .await
        .context("failed to parse secondary elevation payload")?;

    Ok(response.elevation.first().copied().unwrap_or(0.0).round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secondary_response_missing_entries_defaults_to_sea_level() {
        let response = SecondaryResponse { elevation: vec![] };
        let elevation = response.elevation.first().copied().unwrap_or(0.0).round() as i32;
        assert_eq!(elevation, 0);
    }
}
