//! The analysis pipeline's fan-out/fan-in orchestrator (spec.md §4.1).

use std::time::Instant;

use chrono::Utc;
use metrics::{counter, histogram};
use tracing::{Instrument, instrument, warn};
use uuid::Uuid;

use crate::adapters::{elevation, ground_station, satellite, weather};
use crate::config::Config;
use crate::domain::data_source::{DataSourceKind, DataSourceTag};
use crate::domain::request::{Activity, ValidatedRequest};
use crate::domain::response::OverallSafety;
use crate::domain::{AnalyzeResponse, PollutantSample, Terrain, WeatherHour};
use crate::error::AppError;
use crate::scoring::{aqi, checklist, risk, summary};

const DEFAULT_NO2_PPB: f64 = 20.0;
const DEFAULT_PM25_UGM3: f64 = 15.0;
const NEUTRAL_SUBSCORE: f64 = 8.0;

/// Shared, request-independent clients held by `web::AppState`.
#[derive(Clone)]
pub struct Clients {
    pub http: reqwest::Client,
    pub google_maps: Option<google_maps::Client>,
}

struct AdapterResults {
    satellite: Option<crate::domain::SatellitePixel>,
    ground_station: Option<PollutantSample>,
    weather: Option<Vec<WeatherHour>>,
    elevation: Option<Terrain>,
}

/// `(AnalyzeRequest) -> AnalyzeResponse` (spec.md §4.1). The only error path
/// is a validation failure surfaced before any adapter runs; every
/// subsequent failure degrades to a default rather than propagating.
#[instrument(skip(config, clients, request), fields(request_id = tracing::field::Empty))]
pub async fn analyze(
    config: &Config,
    clients: &Clients,
    request: ValidatedRequest,
) -> Result<AnalyzeResponse, AppError> {
    let request_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", &request_id.as_str());
    let start = Instant::now();

    let results = run_adapters(config, clients, &request).await;

    let (pm25_ugm3, no2_ppb, data_sources) = merge_pollutants(&results);

    let air_quality = aqi::calculate(pm25_ugm3, no2_ppb);

    let weather_forecast = resolve_weather_forecast(&results, &request);
    let current_hour = weather_forecast.first();

    let terrain = results.elevation.unwrap_or_else(Terrain::default_fallback);

    let risk_inputs = risk::RiskInputs {
        activity: request.activity,
        aqi: Some(air_quality.aqi),
        pm25_ugm3: Some(air_quality.pm25),
        no2_ppb: Some(air_quality.no2),
        uv_index: current_hour.map(|h| h.uv_index),
        elevation_m: Some(terrain.elevation_m),
        temp_c: current_hour.map(|h| h.temp_c),
        humidity_pct: current_hour.map(|h| h.humidity_pct),
        wind_kmh: current_hour.map(|h| h.wind_kmh),
        precip_mm: current_hour.map(|h| h.precip_mm),
    };
    let risk_score = risk::score(&risk_inputs);

    let overall_safety = compute_overall_safety(&air_quality, &risk_score, terrain.elevation_m);

    let checklist_items = checklist::build(
        request.activity,
        air_quality.aqi,
        current_hour.map(|h| h.temp_c),
        current_hour.map(|h| h.humidity_pct),
        current_hour.map(|h| h.wind_kmh),
        current_hour.map(|h| h.precip_mm),
        current_hour.map(|h| h.uv_index),
        terrain,
    );

    let summary_inputs = summary::SummaryInputs {
        activity: request.activity,
        risk: &risk_score,
        air_quality: &air_quality,
        weather: current_hour,
        terrain: &terrain,
    };
    let ai_summary = summary::generate(
        &clients.http,
        config.summary_api_key.as_deref(),
        &summary_inputs,
        config.summary_budget,
    )
    .await;

    histogram!("analyze_request_duration_seconds").record(start.elapsed().as_secs_f64());

    Ok(AnalyzeResponse::from_parts(
        request_id,
        &risk_score,
        overall_safety,
        air_quality,
        &weather_forecast,
        terrain,
        &checklist_items,
        ai_summary,
        data_sources,
        Utc::now(),
    ))
}

/// Launches the four adapters concurrently, each guarded by its own
/// per-adapter timeout, all bounded by the outer wall-clock deadline
/// (spec.md §4.1 steps 3-4). A blown outer deadline drops every
/// not-yet-resolved branch and proceeds as if each had returned absent.
async fn run_adapters(config: &Config, clients: &Clients, request: &ValidatedRequest) -> AdapterResults {
    let satellite_fut = adapter_timed("satellite", satellite::fetch(
        &clients.http,
        config.satellite_credentials.as_ref(),
        request.lat,
        request.lon,
        config.adapter_timeout,
        config.adapter_max_attempts,
        config.adapter_retry_backoff,
    ));

    let ground_station_fut = adapter_timed("ground_station", ground_station::fetch(
        &clients.http,
        config.ground_station_api_key.as_deref(),
        request.lat,
        request.lon,
        config.adapter_timeout,
        config.adapter_max_attempts,
        config.adapter_retry_backoff,
    ));

    let weather_fut = adapter_timed("weather", weather::fetch(
        &clients.http,
        request.lat,
        request.lon,
        request.duration_hours,
        config.adapter_timeout,
        config.adapter_max_attempts,
        config.adapter_retry_backoff,
    ));

    let elevation_fut = adapter_timed("elevation", elevation::fetch(
        clients.google_maps.as_ref(),
        &clients.http,
        request.lat,
        request.lon,
        config.adapter_timeout,
        config.adapter_max_attempts,
        config.adapter_retry_backoff,
    ));

    let joined = tokio::time::timeout(
        config.orchestrator_deadline,
        async { tokio::join!(satellite_fut, ground_station_fut, weather_fut, elevation_fut) },
    )
    .await;

    match joined {
        Ok((satellite, ground_station, weather, elevation)) => AdapterResults {
            satellite,
            ground_station,
            weather,
            elevation,
        },
        Err(_) => {
            warn!("orchestrator deadline exceeded, proceeding with defaults for unresolved adapters");
            counter!("orchestrator_deadline_exceeded_total").increment(1);
            AdapterResults {
                satellite: None,
                ground_station: None,
                weather: None,
                elevation: None,
            }
        }
    }
}

/// Wraps an adapter future with a latency histogram and a present/absent
/// outcome counter, without altering its `Option` result.
async fn adapter_timed<T>(name: &'static str, fut: impl std::future::Future<Output = Option<T>>) -> Option<T> {
    let start = Instant::now();
    let result = fut.instrument(tracing::debug_span!("adapter", adapter = name)).await;
    histogram!("adapter_duration_seconds", "adapter" => name).record(start.elapsed().as_secs_f64());
    counter!("adapter_outcome_total", "adapter" => name, "outcome" => if result.is_some() { "present" } else { "absent" })
        .increment(1);
    result
}

/// Merge NO₂ and PM2.5 per spec.md §4.1 step 5, recording provenance for
/// each value in `data_sources`.
fn merge_pollutants(results: &AdapterResults) -> (Option<f64>, Option<f64>, Vec<String>) {
    let mut data_sources = Vec::new();

    let no2_ppb = if let Some(pixel) = &results.satellite {
        data_sources.push(DataSourceTag::present(DataSourceKind::Satellite).to_string());
        Some(pixel.no2_ppb)
    } else if let Some(sample) = &results.ground_station
        && let Some(no2) = sample.no2_ppb
    {
        data_sources.push(DataSourceTag::present(DataSourceKind::GroundStation).to_string());
        Some(no2)
    } else {
        data_sources.push(DataSourceTag::fallback(DataSourceKind::GroundStation).to_string());
        Some(DEFAULT_NO2_PPB)
    };

    let pm25_ugm3 = if let Some(sample) = &results.ground_station
        && let Some(pm25) = sample.pm25_ugm3
    {
        data_sources.push(DataSourceTag::present(DataSourceKind::GroundStation).to_string());
        Some(pm25)
    } else {
        data_sources.push(DataSourceTag::fallback(DataSourceKind::GroundStation).to_string());
        Some(DEFAULT_PM25_UGM3)
    };

    if results.weather.is_some() {
        data_sources.push(DataSourceTag::present(DataSourceKind::Weather).to_string());
    } else {
        data_sources.push(DataSourceTag::fallback(DataSourceKind::Weather).to_string());
    }
    if results.elevation.is_some() {
        data_sources.push(DataSourceTag::present(DataSourceKind::Elevation).to_string());
    } else {
        data_sources.push(DataSourceTag::fallback(DataSourceKind::Elevation).to_string());
    }

    (pm25_ugm3, no2_ppb, data_sources)
}

/// Take the hours covered by `[start_time, start_time + duration_hours]`,
/// substituting a single synthesized hour when weather is absent
/// (spec.md §4.1 step 7).
fn resolve_weather_forecast(results: &AdapterResults, request: &ValidatedRequest) -> Vec<WeatherHour> {
    match &results.weather {
        Some(hours) if !hours.is_empty() => hours.clone(),
        _ => vec![WeatherHour::synthesized_default(request.start_time)],
    }
}

/// `environmental/health/terrain/overall` breakdown (spec.md §4.1 step 9).
/// Every arithmetic path is already fed finite defaults upstream, so no
/// branch here can see an absent value.
fn compute_overall_safety(
    air_quality: &crate::domain::AirQuality,
    risk_score: &crate::domain::RiskScore,
    elevation_m: i32,
) -> OverallSafety {
    let environmental = ((100.0 - air_quality.aqi as f64) / 10.0).clamp(0.0, 10.0);
    let health = risk_score.score;
    let terrain = if elevation_m < 1000 {
        9.0
    } else if elevation_m < 2000 {
        7.5
    } else if elevation_m < 3000 {
        6.0
    } else {
        4.5
    };

    let overall = (0.30 * environmental + 0.50 * health + 0.20 * terrain)
        .clamp(0.0, 10.0);

    OverallSafety {
        environmental,
        health,
        terrain,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AqiCategory, DominantPollutant};

    fn sample_air_quality(aqi: u32) -> crate::domain::AirQuality {
        crate::domain::AirQuality {
            aqi,
            category: AqiCategory::from_aqi(aqi),
            pm25: 10.0,
            no2: 15.0,
            dominant_pollutant: DominantPollutant::Pm25,
        }
    }

    fn sample_risk(score: f64) -> crate::domain::RiskScore {
        crate::domain::RiskScore {
            score,
            category: crate::domain::RiskCategory::from_score(score),
            sub_scores: crate::domain::SubScores {
                air: 9.0,
                weather: 8.0,
                uv: 8.0,
                terrain: 10.0,
            },
            warnings: vec![],
        }
    }

    #[test]
    fn overall_safety_uses_neutral_terrain_band_below_1000m() {
        let safety = compute_overall_safety(&sample_air_quality(50), &sample_risk(8.0), 500);
        assert_eq!(safety.terrain, 9.0);
    }

    #[test]
    fn overall_safety_terrain_band_above_3000m() {
        let safety = compute_overall_safety(&sample_air_quality(50), &sample_risk(8.0), 3500);
        assert_eq!(safety.terrain, 4.5);
    }

    #[test]
    fn merge_pollutants_defaults_when_every_adapter_absent() {
        let results = AdapterResults {
            satellite: None,
            ground_station: None,
            weather: None,
            elevation: None,
        };
        let (pm25, no2, sources) = merge_pollutants(&results);
        assert_eq!(pm25, Some(DEFAULT_PM25_UGM3));
        assert_eq!(no2, Some(DEFAULT_NO2_PPB));
        assert!(sources.iter().any(|s| s.contains("fallback")));
    }

    #[test]
    fn merge_pollutants_prefers_satellite_no2_over_ground_station() {
        let results = AdapterResults {
            satellite: Some(crate::domain::SatellitePixel {
                no2_column_molec_cm2: 1.0e16,
                no2_ppb: 4.0,
                quality_flag: crate::domain::QualityFlag::Good,
                granule_id: "g1".to_string(),
                observation_time: Utc::now(),
                pixel_offset_km: 1.0,
            }),
            ground_station: Some(PollutantSample {
                pm25_ugm3: Some(12.0),
                no2_ppb: Some(40.0),
                stations_used: 1,
                timestamp: Some(Utc::now()),
            }),
            weather: None,
            elevation: None,
        };
        let (_, no2, sources) = merge_pollutants(&results);
        assert_eq!(no2, Some(4.0));
        assert!(sources.iter().any(|s| s == "satellite"));
    }

    #[test]
    fn resolve_weather_forecast_synthesizes_when_absent() {
        let request = ValidatedRequest {
            activity: Activity::Hiking,
            lat: 0.0,
            lon: 0.0,
            start_time: Utc::now(),
            duration_hours: 4,
        };
        let results = AdapterResults {
            satellite: None,
            ground_station: None,
            weather: None,
            elevation: None,
        };
        let forecast = resolve_weather_forecast(&results, &request);
        assert_eq!(forecast.len(), 1);
        assert_eq!(forecast[0].temp_c, 20.0);
    }
}
