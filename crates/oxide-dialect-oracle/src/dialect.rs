//! Oracle dialect.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use oxide_dialect::{
    exec_ddl, parse_field_for_dialect, query_count, scan, shorten_identifier, ColumnType,
    CommonDialect, DerivedFacts, Dialect, DialectError, IntWidth, PageArg, Result, SqlCommon,
    SqlValue, StructField, ValueType,
};
use tracing::warn;

/// Maximum identifier length.
pub const MAX_IDENTIFIER_LENGTH: usize = 30;

/// Maximum size of an inline binary value.
pub const BYTE_LIMIT: usize = 30000;

/// Upper bound (exclusive) of a `VARCHAR2` size with `MAX_STRING_SIZE = STANDARD`.
const MAX_VARCHAR2_SIZE: usize = 4000;

/// Fallback `VARCHAR2` size.
const DEFAULT_VARCHAR2_SIZE: usize = 255;

/// The `oci8` dialect.
///
/// Operations Oracle handles like any other backend are delegated to a
/// [`CommonDialect`] bound to the same connection.
#[derive(Clone)]
pub struct Oci8Dialect {
    common: CommonDialect,
}

impl Oci8Dialect {
    /// Creates an Oracle dialect bound to `db`.
    #[must_use]
    pub fn new(db: Arc<dyn SqlCommon>) -> Self {
        Self {
            common: CommonDialect::new(db),
        }
    }

    /// Registry constructor.
    #[must_use]
    pub fn bind(db: Arc<dyn SqlCommon>) -> Box<dyn Dialect> {
        Box::new(Self::new(db))
    }

    async fn count(&self, sql: &str, args: &[&str]) -> Result<bool> {
        let args: Vec<SqlValue> = args
            .iter()
            .map(|arg| SqlValue::Text(arg.to_uppercase()))
            .collect();
        Ok(query_count(self.db().as_ref(), sql, &args).await? > 0)
    }

    async fn lookup_row_id(&self, table: &str, locator: &str) -> Result<u64> {
        let query = format!("SELECT id FROM {} WHERE rowid = :1", self.quote(table));
        let row = self
            .db()
            .query_row(&query, &[SqlValue::Text(locator.to_string())])
            .await?;
        // NUMBER keys arrive as floats; negative or non-finite ones fail the scan.
        scan(&row, 0)
    }
}

impl fmt::Debug for Oci8Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Oci8Dialect").finish_non_exhaustive()
    }
}

#[async_trait]
impl Dialect for Oci8Dialect {
    fn name(&self) -> &'static str {
        "oci8"
    }

    fn db(&self) -> &Arc<dyn SqlCommon> {
        self.common.db()
    }

    fn bind_var(&self, ordinal: usize) -> String {
        format!(":{ordinal}")
    }

    fn quote(&self, key: &str) -> String {
        format!(
            "\"{}\"",
            shorten_identifier(key, MAX_IDENTIFIER_LENGTH).to_uppercase()
        )
    }

    fn resolve_column_type(&self, field: &StructField) -> Result<ColumnType> {
        let resolved = parse_field_for_dialect(field, self);
        let mut facts = DerivedFacts::default();

        let string_type = match self.tag_setting(field, "CHARSET") {
            Some(charset) if charset.eq_ignore_ascii_case("utf-8") => "NVARCHAR2",
            _ => "VARCHAR2",
        };

        let sql_type = if resolved.sql_type.is_empty() {
            match &resolved.value {
                ValueType::Bool => "CHAR(1)".to_string(),
                ValueType::Int(IntWidth::W64) | ValueType::Uint(IntWidth::W64) => {
                    if self.tag_setting(field, "AUTO_INCREMENT").is_some()
                        || field.is_primary_key
                    {
                        facts.sequence = true;
                    }
                    "NUMBER".to_string()
                }
                ValueType::Int(_) | ValueType::Uint(_) => {
                    if self.can_auto_increment(field) {
                        facts.auto_increment = Some("GENERATED ALWAYS".to_string());
                        "NUMBER GENERATED ALWAYS AS IDENTITY".to_string()
                    } else {
                        "NUMBER".to_string()
                    }
                }
                ValueType::Float(_) => "FLOAT".to_string(),
                ValueType::String => {
                    let size = if resolved.size > 0 && resolved.size < MAX_VARCHAR2_SIZE {
                        resolved.size
                    } else {
                        DEFAULT_VARCHAR2_SIZE
                    };
                    format!("{string_type}({size})")
                }
                ValueType::Time => "TIMESTAMP".to_string(),
                ValueType::Uuid => format!("{string_type}(36)"),
                // The check constraint rejects malformed documents.
                ValueType::Json => {
                    format!("CLOB CHECK ({} IS JSON)", field.db_name.to_lowercase())
                }
                ValueType::Bytes => "BLOB".to_string(),
                other => return Err(DialectError::unsupported_type(self.name(), other)),
            }
        } else if resolved.value == ValueType::Uuid {
            format!("{string_type}(36)")
        } else {
            resolved.sql_type
        };

        Ok(ColumnType {
            sql_type,
            additional_type: resolved.additional_type,
            facts,
        })
    }

    async fn has_index(&self, table: &str, index: &str) -> Result<bool> {
        self.count(
            "SELECT COUNT(*) FROM USER_INDEXES WHERE TABLE_NAME = :1 AND INDEX_NAME = :2",
            &[table, index],
        )
        .await
    }

    async fn has_foreign_key(&self, table: &str, foreign_key: &str) -> Result<bool> {
        self.count(
            "SELECT COUNT(*) FROM USER_CONSTRAINTS WHERE CONSTRAINT_TYPE = 'R' \
             AND TABLE_NAME = :1 AND CONSTRAINT_NAME = :2",
            &[table, foreign_key],
        )
        .await
    }

    async fn remove_index(&self, table: &str, index: &str) -> Result<()> {
        self.common.remove_index(table, index).await
    }

    async fn remove_constraint(&self, table: &str, constraint: &str) -> Result<()> {
        self.common.remove_constraint(table, constraint).await
    }

    async fn has_table(&self, table: &str) -> Result<bool> {
        self.count(
            "SELECT COUNT(*) FROM USER_TABLES WHERE TABLE_NAME = :1",
            &[table],
        )
        .await
    }

    async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.count(
            "SELECT COUNT(*) FROM USER_TAB_COLUMNS WHERE TABLE_NAME = :1 AND COLUMN_NAME = :2",
            &[table, column],
        )
        .await
    }

    async fn modify_column(&self, table: &str, column: &str, typ: &str) -> Result<()> {
        exec_ddl(
            self.db().as_ref(),
            &format!("ALTER TABLE {table} MODIFY {column} {typ}"),
        )
        .await
    }

    async fn drop_nullable(&self, table: &str, column: &str, typ: &str) -> Result<()> {
        exec_ddl(
            self.db().as_ref(),
            &format!("ALTER TABLE {table} MODIFY {column} {typ} NULL"),
        )
        .await
    }

    fn limit_and_offset_sql(&self, limit: Option<PageArg>, offset: Option<PageArg>) -> String {
        if limit.is_none() && offset.is_none() {
            return String::new();
        }

        let limit = limit.as_ref().and_then(PageArg::parse).filter(|n| *n >= 0);
        let offset = offset.as_ref().and_then(PageArg::parse).filter(|n| *n >= 0);

        let mut sql = String::new();
        match (offset, limit) {
            (Some(offset), _) => sql.push_str(&format!(" OFFSET {offset}")),
            // A fetch clause needs an offset.
            (None, Some(limit)) if limit > 0 => sql.push_str(" OFFSET 0"),
            _ => {}
        }
        if let Some(limit) = limit {
            sql.push_str(&format!(" ROWS FETCH NEXT {limit} ROWS ONLY"));
        }
        sql
    }

    fn select_from_dummy_table(&self) -> &'static str {
        "FROM DUAL"
    }

    fn last_insert_id_returning_suffix(&self, table: &str, column: &str) -> String {
        self.common.last_insert_id_returning_suffix(table, column)
    }

    fn default_value_str(&self) -> &'static str {
        self.common.default_value_str()
    }

    fn build_key_name(&self, kind: &str, table: &str, fields: &[&str]) -> String {
        self.common.build_key_name(kind, table, fields)
    }

    fn normalize_index_and_column(&self, index: &str, column: &str) -> (String, String) {
        self.common.normalize_index_and_column(index, column)
    }

    async fn current_database(&self) -> Result<String> {
        let row = self
            .db()
            .query_row("SELECT SYS_CONTEXT('USERENV', 'CURRENT_SCHEMA') FROM DUAL", &[])
            .await?;
        scan(&row, 0)
    }

    async fn resolve_row_id(&self, table: &str, row_id: u64) -> u64 {
        let locator = self.db().row_locator(row_id);
        match self.lookup_row_id(table, &locator).await {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    dialect = "oci8",
                    row_id = %locator,
                    error = %err,
                    "unable to fetch ID for row ID"
                );
                row_id
            }
        }
    }

    fn client_statement_separator(&self) -> &'static str {
        ""
    }

    fn column_equality(&self, field_db_name: &str, column: &str) -> bool {
        field_db_name.eq_ignore_ascii_case(column)
    }

    fn byte_limit(&self) -> Option<usize> {
        Some(BYTE_LIMIT)
    }
}
