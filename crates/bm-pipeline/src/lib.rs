//! Battmon ingestion pipeline.
//!
//! This crate provides:
//! - [`loader`]: asset-catalog and per-device telemetry providers
//! - [`transform`]: the pure expansion of nested series into flat records
//! - [`pipeline`]: the per-device fetch → transform → write driver and the
//!   schema-setup entry point
//! - [`exit_codes`]: stable process exit codes for the `battmon` binary

pub mod exit_codes;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod transform;

pub use exit_codes::ExitCode;
pub use pipeline::{run_ingestion, run_schema_setup, RunReport};
pub use transform::transform;
