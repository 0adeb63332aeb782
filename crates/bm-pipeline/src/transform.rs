//! Expansion of nested per-metric series into flat telemetry records.

use bm_common::{Error, Result, TelemetryDocument, TelemetryRecord};
use chrono::{DateTime, Utc};

/// Expand a per-device telemetry document into flat records.
///
/// A pure 1:1 mapping of (series × sample): no deduplication, filtering, or
/// reordering. Output order is series order, then sample order within each
/// series. Empty inputs yield an empty vector.
///
/// Epoch-millisecond timestamps are converted to UTC instants exactly; a
/// value outside chrono's representable range is a telemetry-validation
/// error for the device, distinct from the absence case.
pub fn transform(device_id: &str, telemetry: &TelemetryDocument) -> Result<Vec<TelemetryRecord>> {
    let total: usize = telemetry.series.iter().map(|s| s.data.len()).sum();
    let mut records = Vec::with_capacity(total);

    for series in &telemetry.series {
        for &(ts_ms, value) in &series.data {
            let recorded_at = DateTime::<Utc>::from_timestamp_millis(ts_ms).ok_or_else(|| {
                Error::TelemetryValidation {
                    device_id: device_id.to_string(),
                    reason: format!("timestamp {ts_ms} ms is outside the representable range"),
                }
            })?;
            records.push(TelemetryRecord {
                recorded_at,
                device_id: device_id.to_string(),
                metric_name: series.name.clone(),
                value,
            });
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_common::TelemetrySeries;

    fn doc(series: Vec<TelemetrySeries>) -> TelemetryDocument {
        TelemetryDocument { series }
    }

    fn series(name: &str, data: Vec<(i64, f64)>) -> TelemetrySeries {
        TelemetrySeries {
            name: name.to_string(),
            data,
        }
    }

    #[test]
    fn empty_series_list_yields_empty_output() {
        let records = transform("dev-1", &doc(vec![])).expect("transform");
        assert!(records.is_empty());
    }

    #[test]
    fn empty_sample_list_yields_empty_output() {
        let records =
            transform("dev-1", &doc(vec![series("StateOfChargePercentage", vec![])]))
                .expect("transform");
        assert!(records.is_empty());
    }

    #[test]
    fn produces_one_record_per_sample_across_series() {
        let telemetry = doc(vec![
            series("StateOfChargePercentage", vec![(0, 90.0), (1000, 89.5)]),
            series("Temperature", vec![(0, 21.0), (1000, 21.2), (2000, 21.3)]),
        ]);
        let records = transform("dev-1", &telemetry).expect("transform");
        assert_eq!(records.len(), 5);

        // Series order, then sample order within each series.
        assert_eq!(records[0].metric_name, "StateOfChargePercentage");
        assert_eq!(records[1].metric_name, "StateOfChargePercentage");
        assert_eq!(records[2].metric_name, "Temperature");
        assert_eq!(records[2].value, 21.0);
        assert_eq!(records[4].value, 21.3);
        assert!(records.iter().all(|r| r.device_id == "dev-1"));
    }

    #[test]
    fn concrete_soc_scenario_maps_exact_instants() {
        let telemetry = doc(vec![series(
            "StateOfChargePercentage",
            vec![(1_700_000_000_000, 87.5), (1_700_003_600_000, 85.0)],
        )]);
        let records = transform("dev-1", &telemetry).expect("transform");
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].recorded_at.to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
        assert_eq!(records[0].value, 87.5);
        assert_eq!(
            records[1].recorded_at.to_rfc3339(),
            "2023-11-14T23:13:20+00:00"
        );
        assert_eq!(records[1].value, 85.0);
    }

    #[test]
    fn timestamp_boundary_cases_convert_exactly() {
        let telemetry = doc(vec![series(
            "StateOfChargePercentage",
            vec![(0, 1.0), (-1_000, 2.0), (253_402_300_799_000, 3.0)],
        )]);
        let records = transform("dev-1", &telemetry).expect("transform");
        assert_eq!(records[0].recorded_at.timestamp_millis(), 0);
        assert_eq!(records[1].recorded_at.timestamp_millis(), -1_000);
        // 9999-12-31T23:59:59Z, far future but representable.
        assert_eq!(records[2].recorded_at.timestamp_millis(), 253_402_300_799_000);
    }

    #[test]
    fn out_of_range_timestamp_is_a_validation_error() {
        let telemetry = doc(vec![series("StateOfChargePercentage", vec![(i64::MAX, 1.0)])]);
        let err = transform("dev-1", &telemetry).unwrap_err();
        assert!(matches!(
            err,
            Error::TelemetryValidation { ref device_id, .. } if device_id == "dev-1"
        ));
    }
}
