//! Error types for Battmon.

use thiserror::Error;

/// Result type alias for Battmon operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Battmon.
///
/// Callers pattern-match on variants to decide recovery vs. propagation:
/// `AggregateRefresh` and per-device failures are recovered locally by the
/// pipeline, everything else aborts the run.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to connect to store: {source}")]
    Connect { source: sqlx::Error },

    // Validation errors (20-29)
    #[error("invalid asset catalog: {0}")]
    AssetValidation(String),

    #[error("invalid telemetry for device {device_id}: {reason}")]
    TelemetryValidation { device_id: String, reason: String },

    // Store errors (30-39)
    #[error("statement failed: {statement}: {source}")]
    Statement {
        /// First line of the statement only, never row payloads.
        statement: String,
        source: sqlx::Error,
    },

    #[error("batch insert failed ({rows} rows): {statement}: {source}")]
    Write {
        statement: String,
        rows: usize,
        source: sqlx::Error,
    },

    #[error("continuous aggregate refresh failed: {source}")]
    AggregateRefresh { source: sqlx::Error },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::Connect { .. } => 11,
            Error::AssetValidation(_) => 20,
            Error::TelemetryValidation { .. } => 21,
            Error::Statement { .. } => 30,
            Error::Write { .. } => 31,
            Error::AggregateRefresh { .. } => 32,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Whether this error is recovered locally rather than aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::AggregateRefresh { .. } | Error::TelemetryValidation { .. }
        )
    }
}
