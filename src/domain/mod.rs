//! Plain-record domain types shared by every component.
//!
//! Nothing in this module owns any state beyond the lifetime of a single
//! request: all entities are created, filled in, and discarded when the
//! response is serialized (spec.md §3, "Lifecycle").

pub mod air_quality;
pub mod checklist;
pub mod data_source;
pub mod pollutant;
pub mod request;
pub mod response;
pub mod risk;
pub mod satellite;
pub mod terrain;
pub mod weather;

pub use air_quality::{AirQuality, DominantPollutant};
pub use checklist::{ChecklistCategory, ChecklistItem};
pub use data_source::DataSourceTag;
pub use pollutant::PollutantSample;
pub use request::{Activity, AnalyzeRequest};
pub use response::{AnalyzeResponse, OverallSafety};
pub use risk::{RiskCategory, RiskFactor, RiskScore, SubScores};
pub use satellite::{QualityFlag, SatellitePixel};
pub use terrain::{Terrain, TerrainType};
pub use weather::WeatherHour;
