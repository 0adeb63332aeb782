//! Battmon time-series store.
//!
//! This crate provides:
//! - [`StoreClient`]: pooled connection manager with one-shot and scoped
//!   execution primitives
//! - [`writer`]: idempotent, transactional batch insert of telemetry records
//! - [`schema`]: one-shot provisioning of the hypertable, compression
//!   policy, and the daily-minimum-SOC continuous aggregate

pub mod client;
pub mod schema;
pub mod writer;

pub use client::StoreClient;
pub use schema::{DAILY_SOC_VIEW, SOC_METRIC, TELEMETRY_TABLE};
pub use writer::write_batch;
