//! The public response contract (spec.md §6). These are pure wire-format
//! DTOs: the orchestrator builds the internal domain types above and
//! converts them into this shape exactly once, at the end of the pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AirQuality, ChecklistItem, RiskFactor, RiskScore, Terrain, WeatherHour};

#[derive(Debug, Clone, Serialize)]
pub struct OverallSafety {
    pub environmental: f64,
    pub health: f64,
    pub terrain: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AirQualityView {
    pub aqi: u32,
    pub category: String,
    pub pm25: f64,
    pub no2: f64,
    pub dominant_pollutant: String,
}

impl From<AirQuality> for AirQualityView {
    fn from(a: AirQuality) -> Self {
        Self {
            aqi: a.aqi,
            category: a.category.label().to_string(),
            pm25: a.pm25,
            no2: a.no2,
            dominant_pollutant: a.dominant_pollutant.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherHourView {
    pub timestamp: DateTime<Utc>,
    pub temp_c: f64,
    pub humidity: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction: f64,
    pub uv_index: f64,
    pub precipitation_mm: f64,
    pub cloud_cover: f64,
}

impl From<&WeatherHour> for WeatherHourView {
    fn from(h: &WeatherHour) -> Self {
        Self {
            timestamp: h.timestamp,
            temp_c: h.temp_c,
            humidity: h.humidity_pct,
            wind_speed_kmh: h.wind_kmh,
            wind_direction: h.wind_dir_deg,
            uv_index: h.uv_index,
            precipitation_mm: h.precip_mm,
            cloud_cover: h.cloud_cover_pct,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ElevationView {
    pub elevation_m: f64,
    pub terrain_type: String,
    pub slope_degrees: Option<f64>,
}

impl From<Terrain> for ElevationView {
    fn from(t: Terrain) -> Self {
        Self {
            elevation_m: t.elevation_m as f64,
            terrain_type: t.terrain_type.label().to_string(),
            slope_degrees: t.slope_degrees,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItemView {
    pub item: String,
    pub required: bool,
    pub reason: String,
    pub category: String,
}

impl From<&ChecklistItem> for ChecklistItemView {
    fn from(c: &ChecklistItem) -> Self {
        Self {
            item: c.item.clone(),
            required: c.required,
            reason: c.reason.clone(),
            category: c.category.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskFactorView {
    pub factor: String,
    pub score: f64,
    pub weight: f64,
}

impl From<&RiskFactor> for RiskFactorView {
    fn from(r: &RiskFactor) -> Self {
        Self {
            factor: r.factor.clone(),
            score: r.score,
            weight: r.weight,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: String,
    pub risk_score: f64,
    pub category: String,
    #[serde(rename = "overallSafety")]
    pub overall_safety: OverallSafety,
    pub air_quality: AirQualityView,
    pub weather_forecast: Vec<WeatherHourView>,
    pub elevation: ElevationView,
    pub checklist: Vec<ChecklistItemView>,
    pub warnings: Vec<String>,
    pub ai_summary: String,
    pub risk_factors: Vec<RiskFactorView>,
    pub data_sources: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl AnalyzeResponse {
    pub fn from_parts(
        request_id: String,
        risk: &RiskScore,
        overall_safety: OverallSafety,
        air_quality: AirQuality,
        weather_forecast: &[WeatherHour],
        elevation: Terrain,
        checklist: &[ChecklistItem],
        ai_summary: String,
        data_sources: Vec<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id,
            risk_score: risk.score,
            category: risk.category.label().to_string(),
            overall_safety,
            air_quality: air_quality.into(),
            weather_forecast: weather_forecast.iter().map(WeatherHourView::from).collect(),
            elevation: elevation.into(),
            checklist: checklist.iter().map(ChecklistItemView::from).collect(),
            warnings: risk.warnings.clone(),
            ai_summary,
            risk_factors: risk.risk_factors().iter().map(RiskFactorView::from).collect(),
            data_sources,
            generated_at,
        }
    }
}
