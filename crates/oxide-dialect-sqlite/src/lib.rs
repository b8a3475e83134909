//! # oxide-dialect-sqlite
//!
//! SQLite support for `oxide-dialect`, registered under the name `sqlite3`,
//! and the sqlx binding used to run catalog queries against a SQLite pool.
//!
//! # How SQLite differs from other dialects
//!
//! - **[Type affinity]**: SQLite uses a type-affinity system rather than
//!   strict column types, so lower-case affinity names (`integer`, `real`,
//!   `text`, `blob`) are emitted.
//! - **[AUTOINCREMENT]**: only an `integer primary key` column can
//!   auto-increment; the primary key clause is part of the column type.
//! - **No `INFORMATION_SCHEMA`**: introspection matches the DDL stored in
//!   `sqlite_master`.
//! - **Current database**: the first entry of `PRAGMA database_list`,
//!   normally `main`.
//!
//! [Type affinity]: https://www.sqlite.org/datatype3.html
//! [AUTOINCREMENT]: https://www.sqlite.org/autoinc.html
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use oxide_dialect::{resolve_dialect, Dialect, StructField};
//! use oxide_dialect_sqlite::SqliteDatabase;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), oxide_dialect::DialectError> {
//! oxide_dialect_sqlite::register();
//! let db = SqliteDatabase::connect("sqlite::memory:").await?;
//! let dialect = resolve_dialect("sqlite3", Arc::new(db));
//!
//! let mut id = StructField::of::<i64>("ID").primary_key();
//! assert_eq!(
//!     dialect.column_type(&mut id)?,
//!     "integer primary key autoincrement"
//! );
//! assert!(!dialect.has_table("users").await?);
//! # Ok(())
//! # }
//! ```

mod conn;
mod dialect;

pub use conn::SqliteDatabase;
pub use dialect::Sqlite3Dialect;

/// Registers the `sqlite3` dialect.
pub fn register() {
    oxide_dialect::register_dialect("sqlite3", Sqlite3Dialect::bind);
}
