//! Pure scoring logic: AQI calculation, risk scoring, checklist generation,
//! and the (best-effort) narrative summary. Nothing in this module performs
//! I/O except `summary`, which is isolated behind its own budget and never
//! fails the request.

pub mod aqi;
pub mod checklist;
pub mod risk;
pub mod summary;
