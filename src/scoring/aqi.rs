//! EPA AQI calculation from pollutant concentrations (spec.md §4.3).
//!
//! Breakpoint tables are the single source of truth referenced by both the
//! AQI calculator and the risk scorer's air sub-score (spec.md §9,
//! "Single-source-of-truth for thresholds").

use crate::domain::{AirQuality, AqiCategory, DominantPollutant};

/// (concentration_low, concentration_high, aqi_low, aqi_high)
type Breakpoint = (f64, f64, f64, f64);

/// PM2.5 24-hour breakpoints (µg/m³), reused here as instantaneous per
/// spec.md §4.3.
pub const PM25_BREAKPOINTS: &[Breakpoint] = &[
    (0.0, 12.0, 0.0, 50.0),
    (12.1, 35.4, 51.0, 100.0),
    (35.5, 55.4, 101.0, 150.0),
    (55.5, 150.4, 151.0, 200.0),
    (150.5, 250.4, 201.0, 300.0),
    (250.5, 350.4, 301.0, 400.0),
    (350.5, 500.4, 401.0, 500.0),
];

/// NO2 1-hour breakpoints (ppb) per the published EPA table.
pub const NO2_BREAKPOINTS: &[Breakpoint] = &[
    (0.0, 53.0, 0.0, 50.0),
    (54.0, 100.0, 51.0, 100.0),
    (101.0, 360.0, 101.0, 150.0),
    (361.0, 649.0, 151.0, 200.0),
    (650.0, 1249.0, 201.0, 300.0),
    (1250.0, 1649.0, 301.0, 400.0),
    (1650.0, 2049.0, 401.0, 500.0),
];

/// Neutral fallback when both pollutants are absent (spec.md §4.3).
pub const NEUTRAL_FALLBACK_AQI: u32 = 50;

/// Standard piecewise-linear EPA breakpoint interpolation:
/// `AQI = (I_hi - I_lo) / (C_hi - C_lo) * (C - C_lo) + I_lo`.
fn interpolate(concentration: f64, table: &[Breakpoint]) -> u32 {
    for &(c_lo, c_hi, a_lo, a_hi) in table {
        if concentration <= c_hi {
            let aqi = (a_hi - a_lo) / (c_hi - c_lo) * (concentration - c_lo) + a_lo;
            return aqi.round().clamp(0.0, 500.0) as u32;
        }
    }
    // Above the top published breakpoint: clamp to the maximum AQI.
    500
}

/// `(pm25_ugm3?, no2_ppb?) -> (aqi, dominant_pollutant)` (spec.md §4.3).
///
/// The final AQI is the maximum of the per-pollutant AQIs; if a pollutant is
/// absent it contributes no AQI. If both are absent, returns the neutral
/// fallback `(50, pm25)`.
pub fn calculate(pm25_ugm3: Option<f64>, no2_ppb: Option<f64>) -> AirQuality {
    let pm25_aqi = pm25_ugm3
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| interpolate(v, PM25_BREAKPOINTS));
    let no2_aqi = no2_ppb
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| interpolate(v, NO2_BREAKPOINTS));

    let (aqi, dominant) = match (pm25_aqi, no2_aqi) {
        (Some(p), Some(n)) if n > p => (n, DominantPollutant::No2),
        (Some(p), Some(_)) => (p, DominantPollutant::Pm25),
        (Some(p), None) => (p, DominantPollutant::Pm25),
        (None, Some(n)) => (n, DominantPollutant::No2),
        (None, None) => (NEUTRAL_FALLBACK_AQI, DominantPollutant::Pm25),
    };

    AirQuality {
        aqi,
        category: AqiCategory::from_aqi(aqi),
        pm25: pm25_ugm3.unwrap_or(0.0),
        no2: no2_ppb.unwrap_or(0.0),
        dominant_pollutant: dominant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_absent_yields_neutral_fallback() {
        let result = calculate(None, None);
        assert_eq!(result.aqi, 50);
        assert_eq!(result.dominant_pollutant, DominantPollutant::Pm25);
    }

    #[test]
    fn nyc_good_day_pm25_dominant() {
        // PM2.5 12 µg/m³, NO2 18.5 ppb — both map into the "Good" band, and
        // the PM2.5 AQI (~52) should exceed NO2's (~17) to dominate.
        let result = calculate(Some(12.0), Some(18.5));
        assert!(result.aqi >= 50 && result.aqi <= 55, "{}", result.aqi);
        assert_eq!(result.dominant_pollutant, DominantPollutant::Pm25);
    }

    #[test]
    fn beijing_unhealthy_day() {
        let result = calculate(Some(85.0), Some(40.0));
        assert!(result.aqi >= 150, "{}", result.aqi);
    }

    #[test]
    fn is_monotonic_in_both_pollutants() {
        let low = calculate(Some(10.0), Some(10.0));
        let high = calculate(Some(20.0), Some(20.0));
        assert!(high.aqi >= low.aqi);
    }

    #[test]
    fn is_idempotent() {
        let a = calculate(Some(42.0), Some(30.0));
        let b = calculate(Some(42.0), Some(30.0));
        assert_eq!(a.aqi, b.aqi);
        assert_eq!(a.dominant_pollutant, b.dominant_pollutant);
    }

    #[test]
    fn breakpoint_boundary_50_maps_to_good() {
        // 12.0 µg/m3 is the top of the first PM2.5 breakpoint band (AQI 50).
        let result = calculate(Some(12.0), None);
        assert_eq!(result.aqi, 50);
    }
}
