//! One-shot provisioning of the TimescaleDB schema.
//!
//! Every step is statement-level idempotent (`IF NOT EXISTS` /
//! duplicate-object tolerant), so the procedure can be re-run safely.
//! DDL is kept as plain SQL constants; the table and view names below are
//! part of the compatibility surface.

use bm_common::{Error, Result};
use tracing::{info, warn};

use crate::client::StoreClient;

/// Base hypertable holding normalized telemetry rows.
pub const TELEMETRY_TABLE: &str = "battery_telemetry";

/// Continuous aggregate: daily minimum state of charge per device.
pub const DAILY_SOC_VIEW: &str = "daily_soc_min";

/// Metric name the continuous aggregate is filtered to.
pub const SOC_METRIC: &str = "StateOfChargePercentage";

/// Chunks older than this are eligible for columnar compression.
pub const COMPRESS_AFTER: &str = "7 days";

/// Hash-partition count for the device dimension.
pub const DEVICE_PARTITIONS: u32 = 4;

const CREATE_EXTENSION_SQL: &str = "CREATE EXTENSION IF NOT EXISTS timescaledb CASCADE;";

const CREATE_TABLE_SQL: &str = "\
CREATE TABLE IF NOT EXISTS battery_telemetry (
    recorded_at   TIMESTAMPTZ      NOT NULL,
    device_id     TEXT             NOT NULL,
    metric_name   TEXT             NOT NULL,
    value         DOUBLE PRECISION NOT NULL,
    PRIMARY KEY (recorded_at, device_id, metric_name)
);";

const CREATE_HYPERTABLE_SQL: &str = "\
SELECT create_hypertable(
  'battery_telemetry',
  'recorded_at',
  partitioning_column => 'device_id',
  number_partitions   => 4,
  if_not_exists       => TRUE
);";

const ENABLE_COMPRESSION_SQL: &str = "\
ALTER TABLE battery_telemetry
  SET (
    timescaledb.compress,
    timescaledb.compress_segmentby = 'device_id, metric_name'
  );";

const ADD_COMPRESSION_POLICY_SQL: &str =
    "SELECT add_compression_policy('battery_telemetry', INTERVAL '7 days');";

const CREATE_DAILY_SOC_VIEW_SQL: &str = "\
CREATE MATERIALIZED VIEW IF NOT EXISTS daily_soc_min
WITH (timescaledb.continuous) AS
SELECT
  time_bucket('1 day', recorded_at) AS day,
  device_id,
  MIN(value) AS min_soc
FROM battery_telemetry
WHERE metric_name = 'StateOfChargePercentage'
GROUP BY day, device_id
WITH NO DATA;";

const REFRESH_DAILY_SOC_VIEW_SQL: &str =
    "CALL refresh_continuous_aggregate('daily_soc_min', NULL, NULL);";

/// Provision the extension, hypertable, compression policy, and the
/// continuous aggregate. Safe to re-run; a compression policy that is
/// already registered is logged and treated as success.
pub async fn provision(client: &StoreClient) -> Result<()> {
    info!("provisioning timescale schema");

    client.execute(CREATE_EXTENSION_SQL).await?;
    client.execute(CREATE_TABLE_SQL).await?;
    client.execute(CREATE_HYPERTABLE_SQL).await?;
    client.execute(ENABLE_COMPRESSION_SQL).await?;

    match client.execute(ADD_COMPRESSION_POLICY_SQL).await {
        Err(Error::Statement { source, .. }) if is_duplicate_object(&source) => {
            info!(table = TELEMETRY_TABLE, "compression policy already exists, skipping");
        }
        Err(e) => return Err(e),
        Ok(_) => {}
    }

    client.execute(CREATE_DAILY_SOC_VIEW_SQL).await?;

    info!(
        table = TELEMETRY_TABLE,
        view = DAILY_SOC_VIEW,
        "schema and continuous aggregate created"
    );
    Ok(())
}

/// Materialize the continuous aggregate over its full window.
///
/// Runs on a scoped pooled connection outside any transaction; Timescale
/// rejects `refresh_continuous_aggregate` inside a transaction block.
/// Staleness between ingestion and this call is expected; the batch writer
/// never refreshes.
pub async fn refresh_daily_soc_min(client: &StoreClient) -> Result<()> {
    let mut conn = client.acquire().await?;
    sqlx::raw_sql(REFRESH_DAILY_SOC_VIEW_SQL)
        .execute(&mut *conn)
        .await
        .map_err(|source| {
            warn!(view = DAILY_SOC_VIEW, "continuous aggregate refresh failed");
            Error::AggregateRefresh { source }
        })?;
    info!(view = DAILY_SOC_VIEW, "continuous aggregate refreshed");
    Ok(())
}

/// SQLSTATE 42710: the object (here, the compression policy job) already
/// exists.
fn is_duplicate_object(source: &sqlx::Error) -> bool {
    matches!(
        source,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("42710")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_ddl_declares_natural_key() {
        assert!(CREATE_TABLE_SQL.contains("PRIMARY KEY (recorded_at, device_id, metric_name)"));
        assert!(CREATE_TABLE_SQL.contains("IF NOT EXISTS"));
        assert!(CREATE_TABLE_SQL.contains("DOUBLE PRECISION"));
    }

    #[test]
    fn hypertable_hashes_device_dimension() {
        assert!(CREATE_HYPERTABLE_SQL.contains("partitioning_column => 'device_id'"));
        assert!(CREATE_HYPERTABLE_SQL.contains(&format!("number_partitions   => {DEVICE_PARTITIONS}")));
        assert!(CREATE_HYPERTABLE_SQL.contains("if_not_exists       => TRUE"));
    }

    #[test]
    fn compression_segments_by_device_and_metric() {
        assert!(ENABLE_COMPRESSION_SQL.contains("compress_segmentby = 'device_id, metric_name'"));
        assert!(ADD_COMPRESSION_POLICY_SQL.contains(&format!("INTERVAL '{COMPRESS_AFTER}'")));
    }

    #[test]
    fn aggregate_is_created_empty_and_filtered_to_soc() {
        assert!(CREATE_DAILY_SOC_VIEW_SQL.contains("WITH NO DATA"));
        assert!(CREATE_DAILY_SOC_VIEW_SQL.contains(&format!("metric_name = '{SOC_METRIC}'")));
        assert!(CREATE_DAILY_SOC_VIEW_SQL.contains("time_bucket('1 day', recorded_at)"));
        assert!(CREATE_DAILY_SOC_VIEW_SQL.contains("MIN(value)"));
        assert!(REFRESH_DAILY_SOC_VIEW_SQL.contains(DAILY_SOC_VIEW));
    }
}
