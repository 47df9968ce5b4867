//! Satellite NO₂ subsetter (spec.md §4.2): coverage check, CMR-like granule
//! discovery, then an OPeNDAP pixel read via the `netcdf` crate.

mod catalog;
mod subset;

use std::time::Duration;

use anyhow::{Context, anyhow};
use reqwest::Client;

use crate::adapters::retry::with_retry;
use crate::config::SatelliteCredentials;
use crate::domain::SatellitePixel;

/// Coverage box for the geostationary product (spec.md §4.1 step 3).
pub const COVERAGE_LAT_RANGE: std::ops::RangeInclusive<f64> = 15.0..=70.0;
pub const COVERAGE_LON_RANGE: std::ops::RangeInclusive<f64> = -170.0..=-40.0;

pub fn in_coverage(lat: f64, lon: f64) -> bool {
    COVERAGE_LAT_RANGE.contains(&lat) && COVERAGE_LON_RANGE.contains(&lon)
}

/// `(lat, lon) -> Option<SatellitePixel>` (spec.md §4.2). Never raises: every
/// failure mode (no coverage, no granule, auth failure, missing arrays,
/// out-of-range value, bad quality flag) collapses to `None`.
pub async fn fetch(
    client: &Client,
    credentials: Option<&SatelliteCredentials>,
    lat: f64,
    lon: f64,
    adapter_timeout: Duration,
    max_attempts: u32,
    backoff: Duration,
) -> Option<SatellitePixel> {
    if !in_coverage(lat, lon) {
        return None;
    }
    let credentials = credentials?;

    with_retry("satellite", max_attempts, adapter_timeout, backoff, || {
        fetch_once(client, credentials, lat, lon)
    })
    .await
}

async fn fetch_once(
    client: &Client,
    credentials: &SatelliteCredentials,
    lat: f64,
    lon: f64,
) -> anyhow::Result<SatellitePixel> {
    let granule = catalog::find_granule(client, lat, lon)
        .await
        .context("granule catalog query failed")?
        .ok_or_else(|| anyhow!("no granule found covering the query point"))?;

    let credentials = credentials.clone();
    let granule_id = granule.id.clone();
    let opendap_url = granule.opendap_url.clone();

    tokio::task::spawn_blocking(move || {
        subset::extract_pixel(&opendap_url, &credentials, &granule_id, lat, lon)
    })
    .await
    .context("satellite subsetting task panicked")?
    .ok_or_else(|| anyhow!("pixel extraction yielded no usable value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nyc_is_inside_coverage_box() {
        assert!(in_coverage(40.7829, -73.9654));
    }

    #[test]
    fn beijing_is_outside_coverage_box() {
        assert!(!in_coverage(39.9, 116.4));
    }

    #[test]
    fn coverage_box_edges_are_inclusive() {
        assert!(in_coverage(15.0, -170.0));
        assert!(in_coverage(70.0, -40.0));
    }
}
