//! Hourly weather forecast adapter (spec.md §4.7). Open-Meteo-style free
//! forecast service: no API key required, arrays of hourly values aligned
//! to a parallel `time` array.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::adapters::retry::with_retry;
use crate::domain::WeatherHour;

const FORECAST_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    wind_direction_10m: Vec<Option<f64>>,
    uv_index: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    cloud_cover: Vec<Option<f64>>,
}

/// `(client, lat, lon, duration_hours) -> Option<Vec<WeatherHour>>`
/// (spec.md §4.7). Returns absent unless at least `duration_hours` usable
/// hourly entries are parsed.
pub async fn fetch(
    client: &Client,
    lat: f64,
    lon: f64,
    duration_hours: u32,
    adapter_timeout: Duration,
    max_attempts: u32,
    backoff: Duration,
) -> Option<Vec<WeatherHour>> {
    let response = with_retry("weather", max_attempts, adapter_timeout, backoff, || {
        request_forecast(client, lat, lon, duration_hours)
    })
    .await?;

    let mut hours = parse_hourly(&response.hourly);
    hours.sort_by_key(|h| h.timestamp);

    if (hours.len() as u32) < duration_hours {
        return None;
    }

    hours.truncate(duration_hours as usize);
    Some(hours)
}

async fn request_forecast(
    client: &Client,
    lat: f64,
    lon: f64,
    duration_hours: u32,
) -> Result<ForecastResponse, reqwest::Error> {
    // duration_hours is validated to [1, 72] by AnalyzeRequest::validate;
    // request exactly that many hours so long-window requests aren't
    // silently truncated and pushed to the absent-weather fallback.
    let forecast_hours = duration_hours.clamp(1, 72);
    client
        .get(FORECAST_ENDPOINT)
        .query(&[
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            (
                "hourly",
                "temperature_2m,relative_humidity_2m,wind_speed_10m,wind_direction_10m,uv_index,precipitation,cloud_cover"
                    .to_string(),
            ),
            ("forecast_hours", forecast_hours.to_string()),
            ("timezone", "UTC".to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

fn parse_hourly(hourly: &HourlyBlock) -> Vec<WeatherHour> {
    let mut out = Vec::new();
    for idx in 0..hourly.time.len() {
        let Some(timestamp) = parse_timestamp(&hourly.time[idx]) else {
            continue;
        };

        out.push(WeatherHour {
            timestamp,
            temp_c: hourly.temperature_2m.get(idx).copied().flatten().unwrap_or(20.0),
            humidity_pct: hourly.relative_humidity_2m.get(idx).copied().flatten().unwrap_or(50.0),
            wind_kmh: hourly.wind_speed_10m.get(idx).copied().flatten().unwrap_or(10.0),
            wind_dir_deg: hourly.wind_direction_10m.get(idx).copied().flatten().unwrap_or(0.0),
            uv_index: hourly.uv_index.get(idx).copied().flatten().unwrap_or(5.0),
            precip_mm: hourly.precipitation.get(idx).copied().flatten().unwrap_or(0.0),
            cloud_cover_pct: hourly.cloud_cover.get(idx).copied().flatten().unwrap_or(20.0),
        });
    }
    out
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hourly_skips_unparseable_timestamps() {
        let block = HourlyBlock {
            time: vec!["garbage".to_string(), "2026-07-28T10:00".to_string()],
            temperature_2m: vec![Some(1.0), Some(22.0)],
            relative_humidity_2m: vec![Some(10.0), Some(55.0)],
            wind_speed_10m: vec![Some(1.0), Some(12.0)],
            wind_direction_10m: vec![Some(1.0), Some(180.0)],
            uv_index: vec![Some(1.0), Some(5.0)],
            precipitation: vec![Some(0.0), Some(0.0)],
            cloud_cover: vec![Some(0.0), Some(25.0)],
        };
        let parsed = parse_hourly(&block);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].temp_c, 22.0);
    }

    #[test]
    fn parse_hourly_fills_missing_values_with_defaults() {
        let block = HourlyBlock {
            time: vec!["2026-07-28T10:00".to_string()],
            temperature_2m: vec![None],
            relative_humidity_2m: vec![None],
            wind_speed_10m: vec![None],
            wind_direction_10m: vec![None],
            uv_index: vec![None],
            precipitation: vec![None],
            cloud_cover: vec![None],
        };
        let parsed = parse_hourly(&block);
        assert_eq!(parsed[0].temp_c, 20.0);
        assert_eq!(parsed[0].humidity_pct, 50.0);
    }
}
