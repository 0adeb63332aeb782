//! Exit codes for the battmon CLI.
//!
//! Exit codes communicate run outcome without requiring output parsing.

use bm_common::Error;

/// Exit codes for battmon operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run completed; skips are fine
    Success = 0,

    /// Run completed but one or more devices failed to ingest
    PartialFail = 3,

    /// Configuration error (bad settings, unreachable store, bad credentials)
    ConfigError = 10,

    /// Malformed asset or telemetry payload
    ValidationError = 11,

    /// Store statement or batch write error
    StoreError = 12,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl From<&Error> for ExitCode {
    fn from(error: &Error) -> Self {
        match error {
            Error::Config(_) | Error::Connect { .. } => ExitCode::ConfigError,
            Error::AssetValidation(_) | Error::TelemetryValidation { .. } => {
                ExitCode::ValidationError
            }
            Error::Statement { .. } | Error::Write { .. } | Error::AggregateRefresh { .. } => {
                ExitCode::StoreError
            }
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_map_to_stable_codes() {
        assert_eq!(
            ExitCode::from(&Error::Config("x".into())),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::from(&Error::AssetValidation("x".into())),
            ExitCode::ValidationError
        );
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::PartialFail.is_success());
    }
}
