//! EPA-category air-quality summary (spec.md §3, §4.3).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominantPollutant {
    Pm25,
    No2,
}

impl DominantPollutant {
    pub fn label(self) -> &'static str {
        match self {
            DominantPollutant::Pm25 => "pm25",
            DominantPollutant::No2 => "no2",
        }
    }
}

/// The EPA six-level AQI category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// AQI exactly at a breakpoint (50, 100, 150, 200, 300) maps to the
    /// lower category (spec.md §8, "Boundary behaviors").
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AirQuality {
    pub aqi: u32,
    pub category: AqiCategory,
    pub pm25: f64,
    pub no2: f64,
    pub dominant_pollutant: DominantPollutant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_maps_to_lower_category() {
        assert_eq!(AqiCategory::from_aqi(50), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(100), AqiCategory::Moderate);
        assert_eq!(
            AqiCategory::from_aqi(150),
            AqiCategory::UnhealthyForSensitiveGroups
        );
        assert_eq!(AqiCategory::from_aqi(200), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(300), AqiCategory::VeryUnhealthy);
    }
}
