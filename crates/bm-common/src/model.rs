//! Wire-format models and the normalized time-series record.
//!
//! `Asset`, `AssetCatalog`, `TelemetrySeries` and `TelemetryDocument` mirror
//! the upstream JSON payloads 1:1 (camelCase keys preserved via serde
//! renames). `TelemetryRecord` is the flat, normalized row shape stored in
//! the `battery_telemetry` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single device from the asset registry. Read-only reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Opaque device identity (natural key component from upstream).
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// Descriptive label; passed through unchanged.
    pub description: String,

    /// Lifecycle state string (e.g. "active"); not interpreted here.
    pub state: String,
}

/// Top-level asset registry response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCatalog {
    #[serde(rename = "totalCount")]
    pub total_count: usize,

    pub items: Vec<Asset>,
}

impl AssetCatalog {
    /// Check internal consistency of the catalog.
    ///
    /// The advertised `totalCount` must match the number of items; a
    /// mismatch means the payload was truncated or malformed and is fatal
    /// for the whole run.
    pub fn validate(&self) -> Result<()> {
        if self.total_count != self.items.len() {
            return Err(Error::AssetValidation(format!(
                "totalCount={} but {} items present",
                self.total_count,
                self.items.len()
            )));
        }
        Ok(())
    }
}

/// One named metric with its ordered samples.
///
/// Samples are `(epoch_millis, value)` pairs. Timestamps within a series
/// are assumed roughly monotonic; this is not enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySeries {
    pub name: String,

    /// `[timestamp_ms, value]` pairs in upstream order.
    pub data: Vec<(i64, f64)>,
}

/// Per-device telemetry payload: one series per metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryDocument {
    pub series: Vec<TelemetrySeries>,
}

/// Normalized time-series row.
///
/// The triple (recorded_at, device_id, metric_name) is the natural key:
/// at most one value exists per key in the store, and replaying a write
/// for an existing key is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Sample instant, normalized to UTC.
    pub recorded_at: DateTime<Utc>,

    pub device_id: String,

    pub metric_name: String,

    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_catalog_parses_camel_case() {
        let json = r#"{
            "totalCount": 2,
            "items": [
                {"deviceId": "dev-1", "description": "rack A", "state": "active"},
                {"deviceId": "dev-2", "description": "rack B", "state": "inactive"}
            ]
        }"#;
        let catalog: AssetCatalog = serde_json::from_str(json).expect("parse");
        assert_eq!(catalog.total_count, 2);
        assert_eq!(catalog.items[0].device_id, "dev-1");
        assert_eq!(catalog.items[1].state, "inactive");
        catalog.validate().expect("consistent catalog");
    }

    #[test]
    fn asset_catalog_count_mismatch_fails_validation() {
        let json = r#"{"totalCount": 3, "items": []}"#;
        let catalog: AssetCatalog = serde_json::from_str(json).expect("parse");
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, Error::AssetValidation(_)));
    }

    #[test]
    fn telemetry_document_parses_sample_pairs() {
        let json = r#"{
            "series": [
                {"name": "StateOfChargePercentage", "data": [[1700000000000, 87.5], [1700003600000, 85.0]]}
            ]
        }"#;
        let doc: TelemetryDocument = serde_json::from_str(json).expect("parse");
        assert_eq!(doc.series.len(), 1);
        assert_eq!(doc.series[0].data, vec![(1700000000000, 87.5), (1700003600000, 85.0)]);
    }

    #[test]
    fn empty_series_list_is_valid() {
        let doc: TelemetryDocument = serde_json::from_str(r#"{"series": []}"#).expect("parse");
        assert!(doc.series.is_empty());
    }
}
