//! Battmon shared types.
//!
//! This crate provides:
//! - The wire-format models for assets and per-device telemetry
//! - The normalized `TelemetryRecord` stored in the time-series table
//! - The unified error type used across the pipeline

pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{Asset, AssetCatalog, TelemetryDocument, TelemetryRecord, TelemetrySeries};
