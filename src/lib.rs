//! trailguard: outdoor-activity safety assessment service (spec.md §1-§2).

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod scoring;
pub mod telemetry;
pub mod web;
