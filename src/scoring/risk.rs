//! Risk scoring (spec.md §4.4). Every predicate over a potentially-absent
//! numeric explicitly tests presence before comparing — spec.md §9 calls
//! this the subsystem's most frequent defect class, so every branch below
//! is written as `if let Some(x) = x { ... }` rather than comparing an
//! unwrapped optional.

use crate::domain::request::Activity;
use crate::domain::{RiskCategory, RiskScore, SubScores};

/// Apparent temperature: NOAA Rothfusz heat index when hot/humid, NWS wind
/// chill when cold/windy, otherwise the raw air temperature (spec.md §4.4).
pub fn apparent_temperature(temp_c: f64, humidity_pct: f64, wind_kmh: f64) -> f64 {
    if temp_c > 26.0 && humidity_pct > 40.0 {
        heat_index_c(temp_c, humidity_pct)
    } else if temp_c < 10.0 && wind_kmh > 5.0 {
        wind_chill_c(temp_c, wind_kmh)
    } else {
        temp_c
    }
}

/// Rothfusz regression, evaluated in Fahrenheit (its native units) and
/// converted back to Celsius.
fn heat_index_c(temp_c: f64, humidity_pct: f64) -> f64 {
    let t = temp_c * 9.0 / 5.0 + 32.0;
    let r = humidity_pct;

    let hi = -42.379 + 2.04901523 * t + 10.14333127 * r - 0.22475541 * t * r
        - 0.00683783 * t * t
        - 0.05481717 * r * r
        + 0.00122874 * t * t * r
        + 0.00085282 * t * r * r
        - 0.00000199 * t * t * r * r;

    (hi - 32.0) * 5.0 / 9.0
}

/// NWS wind chill formula, evaluated in Fahrenheit/mph (its native units)
/// and converted back to Celsius/km/h inputs.
fn wind_chill_c(temp_c: f64, wind_kmh: f64) -> f64 {
    let t = temp_c * 9.0 / 5.0 + 32.0;
    let v = wind_kmh * 0.621371; // km/h -> mph

    let wc = 35.74 + 0.6215 * t - 35.75 * v.powf(0.16) + 0.4275 * t * v.powf(0.16);
    (wc - 32.0) * 5.0 / 9.0
}

/// Air sub-score: piecewise on AQI, or analogous PM2.5 bands when AQI is
/// absent, or a neutral default when both are absent (spec.md §4.4).
pub fn air_score(aqi: Option<u32>, pm25_ugm3: Option<f64>) -> f64 {
    if let Some(aqi) = aqi {
        return match aqi {
            0..=50 => lerp_desc(aqi as f64, 0.0, 50.0, 10.0, 9.5),
            51..=100 => lerp_desc(aqi as f64, 51.0, 100.0, 8.0, 6.8),
            101..=150 => lerp_desc(aqi as f64, 101.0, 150.0, 5.5, 4.0),
            151..=200 => lerp_desc(aqi as f64, 151.0, 200.0, 3.5, 2.0),
            201..=300 => lerp_desc(aqi as f64, 201.0, 300.0, 1.5, 0.5),
            _ => lerp_desc((aqi as f64).min(500.0), 301.0, 500.0, 0.5, 0.0),
        };
    }
    if let Some(pm25) = pm25_ugm3 {
        return match pm25 {
            v if v <= 12.0 => lerp_desc(v, 0.0, 12.0, 10.0, 9.5),
            v if v <= 35.4 => lerp_desc(v, 12.1, 35.4, 8.0, 6.8),
            v if v <= 55.4 => lerp_desc(v, 35.5, 55.4, 5.5, 4.0),
            v if v <= 150.4 => lerp_desc(v, 55.5, 150.4, 3.5, 2.0),
            v if v <= 250.4 => lerp_desc(v, 150.5, 250.4, 1.5, 0.5),
            v => lerp_desc(v.min(500.4), 250.5, 500.4, 0.5, 0.0),
        };
    }
    7.0
}

/// Weather sub-score from apparent temperature plus wind/precip/humidity
/// penalties, floored at 0 (spec.md §4.4).
pub fn weather_score(
    temp_c: Option<f64>,
    humidity_pct: Option<f64>,
    wind_kmh: Option<f64>,
    precip_mm: Option<f64>,
) -> f64 {
    let apparent = match (temp_c, humidity_pct, wind_kmh) {
        (Some(t), Some(h), Some(w)) => apparent_temperature(t, h, w),
        (Some(t), _, _) => t,
        _ => return 7.0,
    };

    let mut score = if (18.0..=24.0).contains(&apparent) {
        10.0
    } else if (15.0..=27.0).contains(&apparent) {
        9.0
    } else if (10.0..=32.0).contains(&apparent) {
        7.0
    } else if (5.0..=38.0).contains(&apparent) {
        4.0
    } else if (0.0..=43.0).contains(&apparent) {
        2.0
    } else {
        1.0
    };

    if let Some(wind) = wind_kmh
        && wind >= 60.0
    {
        score -= 3.0;
    }
    if let Some(precip) = precip_mm
        && precip >= 50.0
    {
        score -= 3.0;
    }
    if let Some(humidity) = humidity_pct
        && !(20.0..=90.0).contains(&humidity)
    {
        score -= 1.0;
    }

    score.max(0.0)
}

/// UV sub-score bands (spec.md §4.4).
pub fn uv_score(uv_index: Option<f64>) -> f64 {
    let Some(uv) = uv_index else { return 5.0 };
    match uv {
        v if v <= 2.0 => 10.0,
        v if v <= 5.0 => lerp_desc(v, 2.1, 5.0, 9.5, 8.5),
        v if v <= 7.0 => lerp_desc(v, 5.1, 7.0, 8.0, 6.5),
        v if v <= 10.0 => lerp_desc(v, 7.1, 10.0, 6.0, 4.0),
        v => lerp_desc(v.min(15.0), 10.1, 15.0, 3.5, 0.0),
    }
}

/// Terrain sub-score bands plus activity-specific adjustments (spec.md §4.4).
pub fn terrain_score(elevation_m: Option<i32>, activity: Activity) -> f64 {
    let Some(elevation_m) = elevation_m else {
        return 7.0;
    };
    let elev = elevation_m as f64;

    let mut score = match elev {
        v if v < 1500.0 => 10.0,
        v if v < 2500.0 => lerp_desc(v, 1500.0, 2500.0, 9.5, 9.0),
        v if v < 3500.0 => lerp_desc(v, 2500.0, 3500.0, 8.5, 7.0),
        v if v < 5000.0 => lerp_desc(v, 3500.0, 5000.0, 6.5, 4.0),
        v => lerp_desc(v.min(8000.0), 5000.0, 8000.0, 3.5, 0.0),
    };

    match activity {
        Activity::TrailRunning | Activity::Cycling if elevation_m > 2000 => score -= 1.0,
        Activity::Mountaineering if (1500..3500).contains(&elevation_m) => score += 0.5,
        Activity::Mountaineering if elevation_m > 5000 => score -= 0.5,
        _ => {}
    }

    score.clamp(0.0, 10.0)
}

/// Linear interpolation that descends as `x` increases within `[x_lo, x_hi]`
/// from `y_at_lo` to `y_at_hi` (`y_at_lo >= y_at_hi`), used by every banded
/// sub-score above.
fn lerp_desc(x: f64, x_lo: f64, x_hi: f64, y_at_lo: f64, y_at_hi: f64) -> f64 {
    if x_hi <= x_lo {
        return y_at_lo;
    }
    let t = ((x - x_lo) / (x_hi - x_lo)).clamp(0.0, 1.0);
    y_at_lo + (y_at_hi - y_at_lo) * t
}

/// Inputs to the risk scorer, mirroring spec.md §4.4's contract signature.
pub struct RiskInputs {
    pub activity: Activity,
    pub aqi: Option<u32>,
    pub pm25_ugm3: Option<f64>,
    pub no2_ppb: Option<f64>,
    pub uv_index: Option<f64>,
    pub elevation_m: Option<i32>,
    pub temp_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_kmh: Option<f64>,
    pub precip_mm: Option<f64>,
}

/// `(activity, aqi, pm25?, no2?, uv_index?, elevation_m?, weather_hour?) ->
/// RiskScore` (spec.md §4.4).
pub fn score(inputs: &RiskInputs) -> RiskScore {
    let sub_scores = SubScores {
        air: air_score(inputs.aqi, inputs.pm25_ugm3),
        weather: weather_score(
            inputs.temp_c,
            inputs.humidity_pct,
            inputs.wind_kmh,
            inputs.precip_mm,
        ),
        uv: uv_score(inputs.uv_index),
        terrain: terrain_score(inputs.elevation_m, inputs.activity),
    };

    let total = sub_scores.weighted_total().clamp(0.0, 10.0);

    RiskScore {
        score: total,
        category: RiskCategory::from_score(total),
        sub_scores,
        warnings: warnings(inputs),
    }
}

/// Generates warnings strictly for present inputs — a missing value
/// produces no warning (spec.md §4.4, §8 Testable Property 5).
fn warnings(inputs: &RiskInputs) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(aqi) = inputs.aqi {
        if aqi > 200 {
            warnings.push("Air quality is very unhealthy (AQI > 200).".to_string());
        } else if aqi > 150 {
            warnings.push("Air quality is unhealthy (AQI > 150).".to_string());
        } else if aqi > 100 {
            warnings.push("Air quality is unhealthy for sensitive groups (AQI > 100).".to_string());
        }
    }
    if let Some(pm25) = inputs.pm25_ugm3 {
        if pm25 > 35.0 {
            warnings.push("PM2.5 levels are elevated (> 35 µg/m³).".to_string());
        }
    }
    if let Some(uv) = inputs.uv_index {
        if uv >= 11.0 {
            warnings.push("Extreme UV exposure (UV index >= 11).".to_string());
        } else if uv >= 8.0 {
            warnings.push("Very high UV exposure (UV index >= 8).".to_string());
        } else if uv >= 6.0 {
            warnings.push("High UV exposure (UV index >= 6).".to_string());
        }
    }
    if let Some(temp) = inputs.temp_c {
        if temp > 38.0 {
            warnings.push("Extreme heat expected (> 38°C).".to_string());
        } else if temp < -15.0 {
            warnings.push("Extreme cold expected (< -15°C).".to_string());
        }
    }
    if let Some(wind) = inputs.wind_kmh {
        if wind > 60.0 {
            warnings.push("Dangerously high winds expected (> 60 km/h).".to_string());
        }
    }
    if let Some(precip) = inputs.precip_mm {
        if precip > 50.0 {
            warnings.push("Heavy precipitation expected (> 50 mm).".to_string());
        }
    }
    if let Some(elevation) = inputs.elevation_m {
        if elevation > 4000 {
            warnings.push("High altitude exposure (> 4000 m); watch for altitude sickness.".to_string());
        } else if elevation > 3000 {
            warnings.push("Moderate altitude exposure (> 3000 m).".to_string());
        } else if elevation > 2500 {
            warnings.push("Elevated terrain (> 2500 m).".to_string());
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> RiskInputs {
        RiskInputs {
            activity: Activity::Hiking,
            aqi: Some(52),
            pm25_ugm3: Some(12.0),
            no2_ppb: Some(18.5),
            uv_index: Some(5.0),
            elevation_m: Some(10),
            temp_c: Some(22.0),
            humidity_pct: Some(55.0),
            wind_kmh: Some(12.0),
            precip_mm: Some(0.0),
        }
    }

    #[test]
    fn score_is_within_bounds() {
        let result = score(&inputs());
        assert!((0.0..=10.0).contains(&result.score));
    }

    #[test]
    fn nyc_good_day_scores_good_band() {
        let result = score(&inputs());
        assert!(result.score >= 7.0 && result.score <= 8.5, "{}", result.score);
    }

    #[test]
    fn no_warnings_when_all_inputs_absent() {
        let all_absent = RiskInputs {
            activity: Activity::Hiking,
            aqi: None,
            pm25_ugm3: None,
            no2_ppb: None,
            uv_index: None,
            elevation_m: None,
            temp_c: None,
            humidity_pct: None,
            wind_kmh: None,
            precip_mm: None,
        };
        assert!(warnings(&all_absent).is_empty());
    }

    #[test]
    fn phoenix_extreme_heat_warns_and_scores_low() {
        let phoenix = RiskInputs {
            activity: Activity::TrailRunning,
            aqi: Some(60),
            pm25_ugm3: Some(20.0),
            no2_ppb: None,
            uv_index: Some(11.0),
            elevation_m: Some(331),
            temp_c: Some(42.0),
            humidity_pct: Some(15.0),
            wind_kmh: Some(5.0),
            precip_mm: Some(0.0),
        };
        let result = score(&phoenix);
        assert!(result.sub_scores.weather <= 2.0, "{}", result.sub_scores.weather);
        assert!(result.warnings.iter().any(|w| w.contains("Extreme heat")));
        assert!(result.warnings.iter().any(|w| w.contains("Extreme UV")));
    }

    #[test]
    fn elevation_1609_stays_in_mountains_terrain_band() {
        let denver_terrain = terrain_score(Some(1609), Activity::Hiking);
        assert!((9.0..=9.5).contains(&denver_terrain), "{}", denver_terrain);
    }

    #[test]
    fn heat_index_exceeds_raw_temp_in_hot_humid_conditions() {
        let apparent = apparent_temperature(35.0, 70.0, 5.0);
        assert!(apparent > 35.0, "{}", apparent);
    }

    #[test]
    fn wind_chill_is_colder_than_raw_temp() {
        let apparent = apparent_temperature(0.0, 50.0, 30.0);
        assert!(apparent < 0.0, "{}", apparent);
    }
}
