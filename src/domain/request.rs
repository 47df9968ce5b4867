//! The public request body and the activity taxonomy it carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Recognized activity tags. Any other free-form string is accepted and
/// mapped to `Generic` so the pipeline never rejects a request on an unknown
/// activity name (spec.md §3, `AnalyzeRequest.activity`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Hiking,
    TrailRunning,
    Cycling,
    Camping,
    RockClimbing,
    Mountaineering,
    Generic,
}

impl Activity {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "hiking" | "hike" => Activity::Hiking,
            "trail_running" | "running" | "trailrunning" | "trail_run" | "run" => {
                Activity::TrailRunning
            }
            "cycling" | "biking" | "bike" | "cycle" => Activity::Cycling,
            "camping" | "camp" => Activity::Camping,
            "rock_climbing" | "climbing" | "rockclimbing" => Activity::RockClimbing,
            "mountaineering" | "mountaineer" | "alpinism" => Activity::Mountaineering,
            _ => Activity::Generic,
        }
    }

    /// Physiological character used by risk/checklist activity modifiers
    /// (spec.md §4.4, §4.5, GLOSSARY "Activity modifier").
    pub fn is_aerobic(self) -> bool {
        matches!(self, Activity::TrailRunning | Activity::Cycling)
    }

    pub fn is_technical(self) -> bool {
        matches!(self, Activity::RockClimbing | Activity::Mountaineering)
    }

    pub fn label(self) -> &'static str {
        match self {
            Activity::Hiking => "hiking",
            Activity::TrailRunning => "trail_running",
            Activity::Cycling => "cycling",
            Activity::Camping => "camping",
            Activity::RockClimbing => "rock_climbing",
            Activity::Mountaineering => "mountaineering",
            Activity::Generic => "generic",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub activity: String,
    pub lat: f64,
    pub lon: f64,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_hours: Option<u32>,
}

/// Validated, normalized form of `AnalyzeRequest` the orchestrator consumes.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub activity: Activity,
    pub lat: f64,
    pub lon: f64,
    pub start_time: DateTime<Utc>,
    pub duration_hours: u32,
}

impl AnalyzeRequest {
    /// Validate coordinates and duration per spec.md §3's invariants.
    /// `start_time` defaults to now, `duration_hours` defaults to 4.
    pub fn validate(self) -> Result<ValidatedRequest, AppError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::BadRequest(format!(
                "lat must be finite and within [-90, 90], got {}",
                self.lat
            )));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(AppError::BadRequest(format!(
                "lon must be finite and within [-180, 180], got {}",
                self.lon
            )));
        }

        let duration_hours = self.duration_hours.unwrap_or(4);
        if !(1..=72).contains(&duration_hours) {
            return Err(AppError::BadRequest(format!(
                "duration_hours must be within [1, 72], got {}",
                duration_hours
            )));
        }

        if self.activity.trim().is_empty() {
            return Err(AppError::BadRequest(
                "activity must not be empty".to_string(),
            ));
        }

        let activity = Activity::parse(&self.activity);

        Ok(ValidatedRequest {
            activity,
            lat: self.lat,
            lon: self.lon,
            start_time: self.start_time.unwrap_or_else(Utc::now),
            duration_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AnalyzeRequest {
        AnalyzeRequest {
            activity: "hiking".to_string(),
            lat: 40.0,
            lon: -105.0,
            start_time: None,
            duration_hours: None,
        }
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let mut req = base();
        req.lat = 95.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_nan_longitude() {
        let mut req = base();
        req.lon = f64::NAN;
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_duration_out_of_range() {
        let mut req = base();
        req.duration_hours = Some(73);
        assert!(req.validate().is_err());
    }

    #[test]
    fn defaults_duration_to_four_hours() {
        let validated = base().validate().unwrap();
        assert_eq!(validated.duration_hours, 4);
    }

    #[test]
    fn unknown_activity_maps_to_generic() {
        let mut req = base();
        req.activity = "underwater basket weaving".to_string();
        let validated = req.validate().unwrap();
        assert_eq!(validated.activity, Activity::Generic);
    }

    #[test]
    fn boundary_coordinates_are_accepted() {
        let mut req = base();
        req.lat = 90.0;
        req.lon = -180.0;
        assert!(req.validate().is_ok());
    }
}
