//! Idempotent batch insert of telemetry records.
//!
//! One transaction per batch: either every new row in the batch is
//! persisted or none are. Replaying the same batch is a no-op per row
//! thanks to `ON CONFLICT DO NOTHING` on the natural key, so a crashed run
//! can be re-driven from the start without corrupting stored data.

use bm_common::{Error, Result, TelemetryRecord};
use tracing::debug;

use crate::client::{first_line, StoreClient};

/// Insert statement for one normalized record. Conflicts on the natural
/// key (recorded_at, device_id, metric_name) are silent per-row no-ops.
pub const INSERT_RECORD_SQL: &str = "\
INSERT INTO battery_telemetry (recorded_at, device_id, metric_name, value)
VALUES ($1, $2, $3, $4)
ON CONFLICT DO NOTHING";

/// Write one batch of records inside a single transaction.
///
/// Returns the number of rows newly inserted (replayed rows do not count).
/// An empty batch is a no-op success with no store round-trip. Any
/// statement failure aborts the whole transaction; no partial application
/// is observable.
pub async fn write_batch(client: &StoreClient, records: &[TelemetryRecord]) -> Result<u64> {
    if records.is_empty() {
        debug!("empty batch, nothing to write");
        return Ok(0);
    }

    let statement = first_line(INSERT_RECORD_SQL);
    debug!(%statement, rows = records.len(), "executing batch insert");

    let mut tx = client.begin().await?;
    let mut inserted = 0u64;
    for record in records {
        let result = sqlx::query(INSERT_RECORD_SQL)
            .bind(record.recorded_at)
            .bind(&record.device_id)
            .bind(&record.metric_name)
            .bind(record.value)
            .execute(&mut *tx)
            .await
            .map_err(|source| Error::Write {
                statement: statement.to_string(),
                rows: records.len(),
                source,
            })?;
        inserted += result.rows_affected();
    }
    tx.commit().await.map_err(|source| Error::Write {
        statement: statement.to_string(),
        rows: records.len(),
        source,
    })?;

    debug!(inserted, "batch insert committed");
    Ok(inserted)
}
