//! Hourly weather observation/forecast record (spec.md §3).

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct WeatherHour {
    pub timestamp: DateTime<Utc>,
    pub temp_c: f64,
    pub humidity_pct: f64,
    pub wind_kmh: f64,
    pub wind_dir_deg: f64,
    pub uv_index: f64,
    pub precip_mm: f64,
    pub cloud_cover_pct: f64,
}

impl WeatherHour {
    /// The synthesized fallback hour used when the weather adapter is
    /// entirely absent (spec.md §4.1 step 7).
    pub fn synthesized_default(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            temp_c: 20.0,
            humidity_pct: 50.0,
            wind_kmh: 10.0,
            wind_dir_deg: 0.0,
            uv_index: 5.0,
            precip_mm: 0.0,
            cloud_cover_pct: 20.0,
        }
    }
}
