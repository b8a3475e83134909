//! The connection handle dialects are bound to.
//!
//! Driver crates (oxide-dialect-sqlite, etc.) implement [`SqlCommon`] for
//! their pool or connection type. The core crate defines only the trait so it
//! stays driver-agnostic.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::value::{scan, Row, SqlValue};

/// Minimal statement interface a dialect needs from its connection.
///
/// Cancellation and timeouts belong to the implementation: a dialect never
/// retries and never wraps a call in its own deadline.
#[async_trait]
pub trait SqlCommon: Send + Sync {
    /// Executes a statement and returns the number of affected rows.
    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<u64>;

    /// Runs a query and returns its first row.
    ///
    /// An empty result is reported as `sqlx::Error::RowNotFound`.
    async fn query_row(&self, sql: &str, args: &[SqlValue]) -> Result<Row>;

    /// Renders a driver-reported row identifier in the backend's native
    /// locator form.
    ///
    /// Drivers that hand back an opaque `ROWID` through the insert result
    /// override this; the default is the decimal rendering.
    fn row_locator(&self, row_id: u64) -> String {
        row_id.to_string()
    }
}

/// Runs a `COUNT(*)` catalog query and returns the count.
///
/// # Errors
///
/// Propagates connection errors and fails if the first column is not numeric.
pub async fn query_count(db: &dyn SqlCommon, sql: &str, args: &[SqlValue]) -> Result<i64> {
    debug!(sql, "catalog query");
    let row = db.query_row(sql, args).await?;
    scan(&row, 0)
}

/// Executes a DDL statement, discarding the affected-row count.
///
/// # Errors
///
/// Returns the connection's error unmodified.
pub async fn exec_ddl(db: &dyn SqlCommon, sql: &str) -> Result<()> {
    debug!(sql, "executing ddl");
    db.exec(sql, &[]).await?;
    Ok(())
}
