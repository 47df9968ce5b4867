//! Ground-station pollutant measurement record.

use chrono::{DateTime, Utc};

/// A merged pollutant sample from the ground-station network. Absence of
/// both fields means the sample carries no value (spec.md §3).
#[derive(Debug, Clone, Default)]
pub struct PollutantSample {
    pub pm25_ugm3: Option<f64>,
    pub no2_ppb: Option<f64>,
    pub stations_used: u32,
    pub timestamp: Option<DateTime<Utc>>,
}
