//! Single-pixel satellite NO₂ observation (spec.md §3, §4.2).

use chrono::{DateTime, Utc};

/// Ordinal product quality flag. `Bad` pixels are rejected before this type
/// is ever constructed (spec.md §4.2 step 6) — only `Good`/`Questionable`
/// survive to become a `SatellitePixel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QualityFlag {
    Questionable,
    Good,
}

#[derive(Debug, Clone)]
pub struct SatellitePixel {
    pub no2_column_molec_cm2: f64,
    pub no2_ppb: f64,
    pub quality_flag: QualityFlag,
    pub granule_id: String,
    pub observation_time: DateTime<Utc>,
    /// Distance in km from the query point to the chosen pixel's center.
    pub pixel_offset_km: f64,
}

/// Documented scaling for the geostationary tropospheric NO₂ column product
/// (spec.md GLOSSARY, "Tropospheric NO₂ column").
pub const COLUMN_TO_PPB_SCALE: f64 = 2.46e15;

/// Out-of-physical-range guard (spec.md §4.2 step 6).
pub const MAX_PHYSICAL_COLUMN: f64 = 5e17;
