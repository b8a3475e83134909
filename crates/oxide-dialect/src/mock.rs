//! Mock connection for testing dialects without a database.
//!
//! Query responses are scripted per SQL text, every statement is recorded
//! with its arguments, and failures can be injected per statement or for the
//! whole connection.
//!
//! ```rust,ignore
//! let conn = MockConnection::new()
//!     .with_count("SELECT COUNT(*) FROM USER_TABLES WHERE TABLE_NAME = :1", 1);
//! let dialect = resolve_dialect("oci8", Arc::new(conn));
//! assert!(dialect.has_table("users").await?);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::conn::SqlCommon;
use crate::error::{DialectError, Result};
use crate::value::{Row, SqlValue};

/// A statement received by a [`MockConnection`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    /// SQL text as sent.
    pub sql: String,
    /// Bound arguments.
    pub args: Vec<SqlValue>,
}

#[derive(Debug, Clone)]
enum Response {
    Row(Row),
    Error(String),
}

type RowLocator = Box<dyn Fn(u64) -> String + Send + Sync>;

/// In-memory [`SqlCommon`] implementation.
///
/// Unscripted queries report `RowNotFound`, unscripted statements affect zero
/// rows.
#[derive(Default)]
pub struct MockConnection {
    responses: Mutex<HashMap<String, Response>>,
    statements: Mutex<Vec<RecordedStatement>>,
    failure: Option<String>,
    row_locator: Option<RowLocator>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockConnection {
    /// Creates a connection with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `sql` with `row`.
    #[must_use]
    pub fn with_row(self, sql: impl Into<String>, row: Row) -> Self {
        self.add_row(sql, row);
        self
    }

    /// Answers `sql` with a single-column count.
    #[must_use]
    pub fn with_count(self, sql: impl Into<String>, count: i64) -> Self {
        self.with_row(sql, vec![SqlValue::Int(count)])
    }

    /// Fails `sql` with a connection error.
    #[must_use]
    pub fn with_error(self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        lock(&self.responses).insert(sql.into(), Response::Error(message.into()));
        self
    }

    /// Fails every statement, as if the connection were lost.
    #[must_use]
    pub fn with_connection_failure(mut self) -> Self {
        self.failure = Some("connection refused".to_string());
        self
    }

    /// Overrides how driver row identifiers are rendered.
    #[must_use]
    pub fn with_row_locator(
        mut self,
        locator: impl Fn(u64) -> String + Send + Sync + 'static,
    ) -> Self {
        self.row_locator = Some(Box::new(locator));
        self
    }

    /// Answers `sql` with `row` from now on.
    pub fn add_row(&self, sql: impl Into<String>, row: Row) {
        lock(&self.responses).insert(sql.into(), Response::Row(row));
    }

    /// Returns every statement received so far, in order.
    #[must_use]
    pub fn statements(&self) -> Vec<RecordedStatement> {
        lock(&self.statements).clone()
    }

    /// Returns the SQL of every statement received so far.
    #[must_use]
    pub fn executed_sql(&self) -> Vec<String> {
        lock(&self.statements).iter().map(|s| s.sql.clone()).collect()
    }

    /// Returns the most recent statement.
    #[must_use]
    pub fn last_statement(&self) -> Option<RecordedStatement> {
        lock(&self.statements).last().cloned()
    }

    fn record(&self, sql: &str, args: &[SqlValue]) -> Result<Option<Row>> {
        lock(&self.statements).push(RecordedStatement {
            sql: sql.to_string(),
            args: args.to_vec(),
        });
        if let Some(message) = &self.failure {
            return Err(DialectError::Connection(message.clone()));
        }
        match lock(&self.responses).get(sql) {
            Some(Response::Row(row)) => Ok(Some(row.clone())),
            Some(Response::Error(message)) => Err(DialectError::Connection(message.clone())),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for MockConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockConnection")
            .field("responses", &lock(&self.responses).len())
            .field("statements", &lock(&self.statements).len())
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SqlCommon for MockConnection {
    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<u64> {
        self.record(sql, args)?;
        Ok(0)
    }

    async fn query_row(&self, sql: &str, args: &[SqlValue]) -> Result<Row> {
        self.record(sql, args)?
            .ok_or(DialectError::Database(sqlx::Error::RowNotFound))
    }

    fn row_locator(&self, row_id: u64) -> String {
        match &self.row_locator {
            Some(locator) => locator(row_id),
            None => row_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_row() {
        let conn = MockConnection::new().with_count("SELECT 1", 7);
        let row = conn.query_row("SELECT 1", &[]).await.unwrap();
        assert_eq!(row, vec![SqlValue::Int(7)]);
    }

    #[tokio::test]
    async fn test_unscripted_query_is_row_not_found() {
        let conn = MockConnection::new();
        let err = conn.query_row("SELECT 1", &[]).await.unwrap_err();
        assert!(err.is_row_not_found());
    }

    #[tokio::test]
    async fn test_records_statements() {
        let conn = MockConnection::new();
        conn.exec("DROP INDEX idx", &[]).await.unwrap();
        let _ = conn.query_row("SELECT ?", &[SqlValue::Int(1)]).await;
        assert_eq!(conn.executed_sql(), ["DROP INDEX idx", "SELECT ?"]);
        assert_eq!(conn.last_statement().unwrap().args, vec![SqlValue::Int(1)]);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let conn = MockConnection::new().with_error("SELECT 1", "timeout");
        assert!(matches!(
            conn.query_row("SELECT 1", &[]).await,
            Err(DialectError::Connection(m)) if m == "timeout"
        ));

        let conn = MockConnection::new().with_connection_failure();
        assert!(conn.exec("DROP TABLE t", &[]).await.is_err());
        assert_eq!(conn.statements().len(), 1);
    }

    #[test]
    fn test_row_locator() {
        assert_eq!(MockConnection::new().row_locator(5), "5");
        let conn = MockConnection::new().with_row_locator(|id| format!("AAAR{id}"));
        assert_eq!(conn.row_locator(5), "AAAR5");
    }
}
