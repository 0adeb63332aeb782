//! Pooled store connection manager.
//!
//! Wraps a `sqlx` Postgres pool and centralizes statement logging: every
//! execution path records the first line of the statement and the outcome,
//! never row payloads.

use bm_common::{Error, Result};
use sqlx::postgres::{PgPoolOptions, Postgres};
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Transaction};
use tracing::{debug, info};

/// Pooled connection to the time-series store.
pub struct StoreClient {
    pool: PgPool,
}

impl StoreClient {
    /// Establish the connection pool.
    ///
    /// Must be called once before any statement execution. Fails with
    /// [`Error::Connect`] when the target is unreachable or credentials
    /// are rejected.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        info!(database = database_name(url), "connecting to store");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|source| Error::Connect { source })?;
        info!("connection pool established");
        Ok(Self { pool })
    }

    /// Run one statement (or a multi-statement script) outside any
    /// caller-visible transaction. Used for DDL and one-shot calls.
    pub async fn execute(&self, sql: &str) -> Result<u64> {
        let statement = first_line(sql);
        debug!(%statement, "executing statement");
        let result = sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(|source| Error::Statement {
                statement: statement.to_string(),
                source,
            })?;
        debug!(%statement, rows_affected = result.rows_affected(), "statement completed");
        Ok(result.rows_affected())
    }

    /// Begin an explicit transaction. Dropping the returned transaction
    /// without committing rolls it back.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|source| Error::Connect { source })
    }

    /// Acquire one pooled connection for the caller's scope.
    ///
    /// This is the deliberate escape hatch for statements that must run on
    /// a single connection outside a transaction (continuous aggregate
    /// refresh); the connection returns to the pool on drop.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|source| Error::Connect { source })
    }

    /// Release all pooled connections. Safe to call after partial or full
    /// use; the driver runs this on both the success and failure paths.
    pub async fn close(&self) {
        info!("closing store connection pool");
        self.pool.close().await;
        info!("store connection pool closed");
    }
}

/// First line of a statement, for diagnostics without payload dumps.
pub(crate) fn first_line(sql: &str) -> &str {
    sql.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}

/// Database name from a connection URL, for log output without credentials.
fn database_name(url: &str) -> &str {
    url.rsplit('/')
        .next()
        .map(|tail| tail.split('?').next().unwrap_or(tail))
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_skips_leading_blanks_and_trims() {
        let sql = "\n  INSERT INTO battery_telemetry (recorded_at)\nVALUES ($1)";
        assert_eq!(first_line(sql), "INSERT INTO battery_telemetry (recorded_at)");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn database_name_strips_credentials_and_params() {
        assert_eq!(
            database_name("postgresql://user:secret@db:5432/battery_monitoring?sslmode=disable"),
            "battery_monitoring"
        );
        assert_eq!(database_name("battery_monitoring"), "battery_monitoring");
    }
}
