//! Generic SQL dialect.
//!
//! Used for any backend without a dedicated dialect. Introspection goes
//! through `INFORMATION_SCHEMA`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::{ColumnType, DerivedFacts, Dialect, PageArg};
use crate::conn::{exec_ddl, query_count, SqlCommon};
use crate::error::{DialectError, Result};
use crate::field::{IntWidth, StructField, ValueType};
use crate::identifier::{self, split_database_and_table};
use crate::resolve::parse_field_for_dialect;
use crate::value::{scan, SqlValue};

/// Largest column size the generic dialect emits.
const MAX_COLUMN_SIZE: usize = 65532;

/// A generic SQL dialect bound to a connection.
#[derive(Clone)]
pub struct CommonDialect {
    db: Arc<dyn SqlCommon>,
}

impl CommonDialect {
    /// Creates a generic dialect bound to `db`.
    #[must_use]
    pub fn new(db: Arc<dyn SqlCommon>) -> Self {
        Self { db }
    }

    /// Registry constructor.
    #[must_use]
    pub fn bind(db: Arc<dyn SqlCommon>) -> Box<dyn Dialect> {
        Box::new(Self::new(db))
    }
}

impl fmt::Debug for CommonDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonDialect").finish_non_exhaustive()
    }
}

fn column_size(size: usize) -> usize {
    if size > 0 && size < MAX_COLUMN_SIZE {
        size
    } else {
        MAX_COLUMN_SIZE
    }
}

#[async_trait]
impl Dialect for CommonDialect {
    fn name(&self) -> &'static str {
        "common"
    }

    fn db(&self) -> &Arc<dyn SqlCommon> {
        &self.db
    }

    fn bind_var(&self, _ordinal: usize) -> String {
        "?".to_string()
    }

    fn quote(&self, key: &str) -> String {
        format!("\"{key}\"")
    }

    fn resolve_column_type(&self, field: &StructField) -> Result<ColumnType> {
        let resolved = parse_field_for_dialect(field, self);

        let sql_type = if resolved.sql_type.is_empty() {
            let auto_increment = self.can_auto_increment(field);
            match &resolved.value {
                ValueType::Bool => "BOOLEAN".to_string(),
                ValueType::Int(IntWidth::W64) | ValueType::Uint(IntWidth::W64) => {
                    if auto_increment {
                        "BIGINT AUTO_INCREMENT".to_string()
                    } else {
                        "BIGINT".to_string()
                    }
                }
                ValueType::Int(_) | ValueType::Uint(_) => {
                    if auto_increment {
                        "INTEGER AUTO_INCREMENT".to_string()
                    } else {
                        "INTEGER".to_string()
                    }
                }
                ValueType::Float(_) => "FLOAT".to_string(),
                ValueType::String => format!("VARCHAR({})", column_size(resolved.size)),
                ValueType::Time => "TIMESTAMP".to_string(),
                ValueType::Bytes | ValueType::Uuid | ValueType::Json => {
                    format!("BINARY({})", column_size(resolved.size))
                }
                other => return Err(DialectError::unsupported_type(self.name(), other)),
            }
        } else {
            resolved.sql_type
        };

        Ok(ColumnType {
            sql_type,
            additional_type: resolved.additional_type,
            facts: DerivedFacts::default(),
        })
    }

    async fn has_index(&self, table: &str, index: &str) -> Result<bool> {
        let (database, table) = split_database_and_table(self, table).await?;
        let count = query_count(
            self.db.as_ref(),
            "SELECT count(*) FROM INFORMATION_SCHEMA.STATISTICS \
             WHERE table_schema = ? AND table_name = ? AND index_name = ?",
            &[
                SqlValue::Text(database),
                SqlValue::Text(table),
                SqlValue::Text(index.to_string()),
            ],
        )
        .await?;
        Ok(count > 0)
    }

    async fn has_foreign_key(&self, table: &str, foreign_key: &str) -> Result<bool> {
        let (database, table) = split_database_and_table(self, table).await?;
        let count = query_count(
            self.db.as_ref(),
            "SELECT count(*) FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS \
             WHERE constraint_schema = ? AND table_name = ? AND constraint_name = ? \
             AND constraint_type = 'FOREIGN KEY'",
            &[
                SqlValue::Text(database),
                SqlValue::Text(table),
                SqlValue::Text(foreign_key.to_string()),
            ],
        )
        .await?;
        Ok(count > 0)
    }

    async fn remove_index(&self, _table: &str, index: &str) -> Result<()> {
        exec_ddl(self.db.as_ref(), &format!("DROP INDEX {index}")).await
    }

    async fn remove_constraint(&self, table: &str, constraint: &str) -> Result<()> {
        exec_ddl(
            self.db.as_ref(),
            &format!("ALTER TABLE {table} DROP CONSTRAINT {constraint}"),
        )
        .await
    }

    async fn has_table(&self, table: &str) -> Result<bool> {
        let (database, table) = split_database_and_table(self, table).await?;
        let count = query_count(
            self.db.as_ref(),
            "SELECT count(*) FROM INFORMATION_SCHEMA.TABLES \
             WHERE table_schema = ? AND table_name = ?",
            &[SqlValue::Text(database), SqlValue::Text(table)],
        )
        .await?;
        Ok(count > 0)
    }

    async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        let (database, table) = split_database_and_table(self, table).await?;
        let count = query_count(
            self.db.as_ref(),
            "SELECT count(*) FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE table_schema = ? AND table_name = ? AND column_name = ?",
            &[
                SqlValue::Text(database),
                SqlValue::Text(table),
                SqlValue::Text(column.to_string()),
            ],
        )
        .await?;
        Ok(count > 0)
    }

    async fn modify_column(&self, table: &str, column: &str, typ: &str) -> Result<()> {
        exec_ddl(
            self.db.as_ref(),
            &format!("ALTER TABLE {table} ALTER COLUMN {column} TYPE {typ}"),
        )
        .await
    }

    async fn drop_nullable(&self, table: &str, column: &str, _typ: &str) -> Result<()> {
        exec_ddl(
            self.db.as_ref(),
            &format!("ALTER TABLE {table} ALTER COLUMN {column} DROP NOT NULL"),
        )
        .await
    }

    fn limit_and_offset_sql(&self, limit: Option<PageArg>, offset: Option<PageArg>) -> String {
        let mut sql = String::new();
        if let Some(limit) = limit.as_ref().and_then(PageArg::parse).filter(|n| *n >= 0) {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset.as_ref().and_then(PageArg::parse).filter(|n| *n >= 0) {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        sql
    }

    fn select_from_dummy_table(&self) -> &'static str {
        ""
    }

    fn last_insert_id_returning_suffix(&self, _table: &str, _column: &str) -> String {
        String::new()
    }

    fn default_value_str(&self) -> &'static str {
        "DEFAULT VALUES"
    }

    fn build_key_name(&self, kind: &str, table: &str, fields: &[&str]) -> String {
        identifier::build_key_name(kind, table, fields)
    }

    fn normalize_index_and_column(&self, index: &str, column: &str) -> (String, String) {
        (index.to_string(), column.to_string())
    }

    async fn current_database(&self) -> Result<String> {
        let row = self.db.query_row("SELECT DATABASE()", &[]).await?;
        scan(&row, 0)
    }

    async fn resolve_row_id(&self, _table: &str, row_id: u64) -> u64 {
        row_id
    }

    fn client_statement_separator(&self) -> &'static str {
        ";"
    }

    fn column_equality(&self, field_db_name: &str, column: &str) -> bool {
        field_db_name == column
    }

    fn byte_limit(&self) -> Option<usize> {
        None
    }
}
