//! [`SqlCommon`] binding for a sqlx SQLite pool.

use async_trait::async_trait;
use oxide_dialect::{Result, Row, SqlCommon, SqlValue};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row as _, Sqlite, TypeInfo, ValueRef};
use tracing::debug;

/// A SQLite pool a dialect can be bound to.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to `url`.
    ///
    /// In-memory databases get a single connection, so every statement sees
    /// the same database.
    ///
    /// # Errors
    ///
    /// Returns the sqlx error if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = pool_options(url).connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Prepares a pool for `url` without opening a connection yet.
    ///
    /// # Errors
    ///
    /// Returns the sqlx error if `url` is not a valid SQLite URL.
    pub fn connect_lazy(url: &str) -> Result<Self> {
        let pool = pool_options(url).connect_lazy(url)?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl From<SqlitePool> for SqliteDatabase {
    fn from(pool: SqlitePool) -> Self {
        Self::new(pool)
    }
}

fn pool_options(url: &str) -> SqlitePoolOptions {
    if url.contains(":memory:") {
        SqlitePoolOptions::new().max_connections(1)
    } else {
        SqlitePoolOptions::new()
    }
}

/// Binds `args` to a query.
fn bind_args<'q>(sql: &'q str, args: &[SqlValue]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    let mut query = sqlx::query(sql);
    for arg in args {
        query = match arg.clone() {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Bool(b) => query.bind(b),
            SqlValue::Int(i) => query.bind(i),
            // SQLite integers are signed; larger values keep their digits as text.
            SqlValue::Uint(u) => match i64::try_from(u) {
                Ok(i) => query.bind(i),
                Err(_) => query.bind(u.to_string()),
            },
            SqlValue::Float(f) => query.bind(f),
            SqlValue::Text(s) => query.bind(s),
            SqlValue::Blob(b) => query.bind(b),
        };
    }
    query
}

/// Reads every column of `row` by its storage class.
fn decode_row(row: &SqliteRow) -> Result<Row> {
    (0..row.len())
        .map(|index| -> Result<SqlValue> {
            let raw = row.try_get_raw(index)?;
            if raw.is_null() {
                return Ok(SqlValue::Null);
            }
            let value = match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => SqlValue::Int(row.try_get_unchecked(index)?),
                "REAL" => SqlValue::Float(row.try_get_unchecked(index)?),
                "BLOB" => SqlValue::Blob(row.try_get_unchecked(index)?),
                _ => SqlValue::Text(row.try_get_unchecked(index)?),
            };
            Ok(value)
        })
        .collect()
}

#[async_trait]
impl SqlCommon for SqliteDatabase {
    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<u64> {
        debug!(sql = %sql, "Executing SQL");
        let result = bind_args(sql, args).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn query_row(&self, sql: &str, args: &[SqlValue]) -> Result<Row> {
        debug!(sql = %sql, "Querying row");
        let row = bind_args(sql, args)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        decode_row(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_db() -> SqliteDatabase {
        SqliteDatabase::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory SQLite pool")
    }

    #[tokio::test]
    async fn test_exec_and_query_row() {
        let db = create_test_db().await;
        db.exec(
            "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT, score REAL, data BLOB)",
            &[],
        )
        .await
        .unwrap();
        let affected = db
            .exec(
                "INSERT INTO notes (body, score, data) VALUES (?, ?, ?)",
                &[
                    SqlValue::Text("hello".into()),
                    SqlValue::Float(1.5),
                    SqlValue::Blob(vec![1, 2]),
                ],
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let row = db
            .query_row(
                "SELECT id, body, score, data, NULL FROM notes WHERE id = ?",
                &[SqlValue::Uint(1)],
            )
            .await
            .unwrap();
        assert_eq!(
            row,
            vec![
                SqlValue::Int(1),
                SqlValue::Text("hello".into()),
                SqlValue::Float(1.5),
                SqlValue::Blob(vec![1, 2]),
                SqlValue::Null,
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_result_is_row_not_found() {
        let db = create_test_db().await;
        let err = db
            .query_row(
                "SELECT name FROM sqlite_master WHERE name = ?",
                &[SqlValue::Text("nope".into())],
            )
            .await
            .unwrap_err();
        assert!(err.is_row_not_found());
    }

    #[tokio::test]
    async fn test_lazy_pool_connects_on_first_use() {
        let db = SqliteDatabase::connect_lazy("sqlite::memory:").unwrap();
        let row = db.query_row("SELECT 1 + 1", &[]).await.unwrap();
        assert_eq!(row, vec![SqlValue::Int(2)]);
    }

    #[tokio::test]
    async fn test_sql_errors_propagate() {
        let db = create_test_db().await;
        let err = db.exec("DROP TABLE missing", &[]).await.unwrap_err();
        assert!(matches!(err, oxide_dialect::DialectError::Database(_)));
    }
}
