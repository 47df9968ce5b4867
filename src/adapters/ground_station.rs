//! Ground-station pollutant adapter (spec.md §4.7).
//!
//! Two-step protocol against a stations catalog: first a nearby-stations
//! query to build a `sensor_id -> parameter` map filtered to {pm25, no2},
//! then per-station latest-measurements queries whose values are averaged.

use std::collections::HashMap;
use std::time::Duration;

use geo::{Distance, Haversine, Point};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::retry::with_retry;
use crate::domain::PollutantSample;

const STATIONS_ENDPOINT: &str = "https://api.openaq.org/v3/locations";
const MEASUREMENTS_ENDPOINT: &str = "https://api.openaq.org/v3/locations";
const SEARCH_RADIUS_M: u32 = 25_000;
const MAX_STATIONS: usize = 5;

#[derive(Debug, Deserialize)]
struct StationsResponse {
    results: Vec<Station>,
}

#[derive(Debug, Deserialize)]
struct Station {
    id: u64,
    coordinates: StationCoordinates,
    sensors: Vec<Sensor>,
}

#[derive(Debug, Deserialize)]
struct StationCoordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct Sensor {
    id: u64,
    parameter: Parameter,
}

#[derive(Debug, Deserialize)]
struct Parameter {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    results: Vec<LatestMeasurement>,
}

#[derive(Debug, Deserialize)]
struct LatestMeasurement {
    #[serde(rename = "sensorsId")]
    sensors_id: u64,
    value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackedParameter {
    Pm25,
    No2,
}

fn classify_parameter(name: &str) -> Option<TrackedParameter> {
    match name.to_lowercase().as_str() {
        "pm25" | "pm2.5" => Some(TrackedParameter::Pm25),
        "no2" => Some(TrackedParameter::No2),
        _ => None,
    }
}

/// `(client, api_key?, lat, lon) -> Option<PollutantSample>` (spec.md §4.7).
pub async fn fetch(
    client: &Client,
    api_key: Option<&str>,
    lat: f64,
    lon: f64,
    adapter_timeout: Duration,
    max_attempts: u32,
    backoff: Duration,
) -> Option<PollutantSample> {
    let stations = with_retry("ground_station.nearby", max_attempts, adapter_timeout, backoff, || {
        nearby_stations(client, api_key, lat, lon)
    })
    .await?;

    if stations.is_empty() {
        debug!("ground_station adapter found no stations within radius");
        return None;
    }

    let origin = Point::new(lon, lat);
    let mut ranked: Vec<(f64, Station)> = stations
        .into_iter()
        .map(|s| {
            let dist_km =
                Haversine.distance(origin, Point::new(s.coordinates.longitude, s.coordinates.latitude))
                    / 1000.0;
            (dist_km, s)
        })
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.truncate(MAX_STATIONS);

    let mut pm25_values = Vec::new();
    let mut no2_values = Vec::new();
    let mut stations_used = 0u32;

    for (_, station) in &ranked {
        let sensor_map: HashMap<u64, TrackedParameter> = station
            .sensors
            .iter()
            .filter_map(|s| classify_parameter(&s.parameter.name).map(|p| (s.id, p)))
            .collect();
        if sensor_map.is_empty() {
            continue;
        }

        let Some(latest) = with_retry(
            "ground_station.latest",
            max_attempts,
            adapter_timeout,
            backoff,
            || latest_measurements(client, api_key, station.id),
        )
        .await
        else {
            continue;
        };

        let mut contributed = false;
        for measurement in latest {
            let Some(parameter) = sensor_map.get(&measurement.sensors_id) else {
                continue;
            };
            match parameter {
                TrackedParameter::Pm25 => {
                    pm25_values.push(measurement.value);
                    contributed = true;
                }
                TrackedParameter::No2 => {
                    // Values below 1 are assumed ppm and converted to µg/m³,
                    // then to ppb. This heuristic can misclassify genuinely
                    // low ppb readings; a definitive fix requires reading
                    // the station's declared unit.
                    let ugm3 = if measurement.value < 1.0 {
                        measurement.value * 1880.0
                    } else {
                        measurement.value
                    };
                    no2_values.push(ugm3 / 1.88);
                    contributed = true;
                }
            }
        }
        if contributed {
            stations_used += 1;
        }
    }

    if pm25_values.is_empty() && no2_values.is_empty() {
        return None;
    }

    Some(PollutantSample {
        pm25_ugm3: mean(&pm25_values),
        no2_ppb: mean(&no2_values),
        stations_used,
        timestamp: Some(chrono::Utc::now()),
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

async fn nearby_stations(
    client: &Client,
    api_key: Option<&str>,
    lat: f64,
    lon: f64,
) -> Result<Vec<Station>, reqwest::Error> {
    let mut request = client.get(STATIONS_ENDPOINT).query(&[
        ("coordinates", format!("{lat},{lon}")),
        ("radius", SEARCH_RADIUS_M.to_string()),
        ("limit", "25".to_string()),
    ]);
    if let Some(key) = api_key {
        request = request.header("X-API-Key", key);
    }

    let response: StationsResponse = request.send().await?.error_for_status()?.json().await?;
    Ok(response.results)
}

async fn latest_measurements(
    client: &Client,
    api_key: Option<&str>,
    station_id: u64,
) -> Result<Vec<LatestMeasurement>, reqwest::Error> {
    let url = format!("{MEASUREMENTS_ENDPOINT}/{station_id}/latest");
    let mut request = client.get(url);
    if let Some(key) = api_key {
        request = request.header("X-API-Key", key);
    }

    let response: LatestResponse = request.send().await?.error_for_status()?.json().await?;
    Ok(response.results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_parameters_case_insensitively() {
        assert_eq!(classify_parameter("PM25"), Some(TrackedParameter::Pm25));
        assert_eq!(classify_parameter("no2"), Some(TrackedParameter::No2));
        assert_eq!(classify_parameter("o3"), None);
    }

    #[test]
    fn no2_ppm_heuristic_converts_small_values() {
        let ppm_like = 0.02;
        let ugm3 = ppm_like * 1880.0;
        let ppb = ugm3 / 1.88;
        assert!((ppb - 20.0).abs() < 0.01);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_averages_values() {
        assert_eq!(mean(&[10.0, 20.0]), Some(15.0));
    }
}
