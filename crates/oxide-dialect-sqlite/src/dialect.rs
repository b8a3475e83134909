//! SQLite dialect implementation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use oxide_dialect::{
    parse_field_for_dialect, query_count, scan, ColumnType, CommonDialect, DerivedFacts, Dialect,
    DialectError, IntWidth, PageArg, Result, SqlCommon, SqlValue, StructField, ValueType,
};

/// Largest `varchar` size emitted; anything else becomes `text`.
const MAX_VARCHAR_SIZE: usize = 65532;

/// The `sqlite3` dialect.
#[derive(Clone)]
pub struct Sqlite3Dialect {
    common: CommonDialect,
}

impl Sqlite3Dialect {
    /// Creates a SQLite dialect bound to `db`.
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

    async fn count(&self, sql: &str, args: Vec<String>) -> Result<bool> {
        let args: Vec<SqlValue> = args.into_iter().map(SqlValue::Text).collect();
        Ok(query_count(self.db().as_ref(), sql, &args).await? > 0)
    }
}

impl fmt::Debug for Sqlite3Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sqlite3Dialect").finish_non_exhaustive()
    }
}

#[async_trait]
impl Dialect for Sqlite3Dialect {
    fn name(&self) -> &'static str {
        "sqlite3"
    }

    fn db(&self) -> &Arc<dyn SqlCommon> {
        self.common.db()
    }

    fn bind_var(&self, ordinal: usize) -> String {
        self.common.bind_var(ordinal)
    }

    fn quote(&self, key: &str) -> String {
        self.common.quote(key)
    }

    fn resolve_column_type(&self, field: &StructField) -> Result<ColumnType> {
        let resolved = parse_field_for_dialect(field, self);
        let mut facts = DerivedFacts::default();

        let sql_type = if resolved.sql_type.is_empty() {
            match &resolved.value {
                ValueType::Bool => "bool".to_string(),
                ValueType::Int(width) | ValueType::Uint(width) => {
                    if self.can_auto_increment(field) {
                        facts.auto_increment = Some("AUTO_INCREMENT".to_string());
                        "integer primary key autoincrement".to_string()
                    } else if *width == IntWidth::W64 {
                        "bigint".to_string()
                    } else {
                        "integer".to_string()
                    }
                }
                ValueType::Float(_) => "real".to_string(),
                ValueType::String => {
                    if resolved.size > 0 && resolved.size < MAX_VARCHAR_SIZE {
                        format!("varchar({})", resolved.size)
                    } else {
                        "text".to_string()
                    }
                }
                ValueType::Time => "datetime".to_string(),
                ValueType::Bytes | ValueType::Uuid | ValueType::Json => "blob".to_string(),
                other => return Err(DialectError::unsupported_type(self.name(), other)),
            }
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
            "SELECT count(*) FROM sqlite_master WHERE tbl_name = ? AND sql LIKE ?",
            vec![table.to_string(), format!("%INDEX {index} ON%")],
        )
        .await
    }

    async fn has_foreign_key(&self, table: &str, foreign_key: &str) -> Result<bool> {
        self.count(
            "SELECT count(*) FROM sqlite_master \
             WHERE type = 'table' AND tbl_name = ? AND (sql LIKE ? OR sql LIKE ?)",
            vec![
                table.to_string(),
                format!("%CONSTRAINT \"{foreign_key}\" %"),
                format!("%CONSTRAINT {foreign_key} %"),
            ],
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
            "SELECT count(*) FROM sqlite_master WHERE type='table' AND name=?",
            vec![table.to_string()],
        )
        .await
    }

    async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.count(
            "SELECT count(*) FROM sqlite_master WHERE tbl_name = ? AND (sql LIKE ? OR sql LIKE ?)",
            vec![
                table.to_string(),
                format!("%\"{column}\" %"),
                format!("%{column} %"),
            ],
        )
        .await
    }

    async fn modify_column(&self, table: &str, column: &str, typ: &str) -> Result<()> {
        self.common.modify_column(table, column, typ).await
    }

    async fn drop_nullable(&self, table: &str, column: &str, typ: &str) -> Result<()> {
        self.common.drop_nullable(table, column, typ).await
    }

    fn limit_and_offset_sql(&self, limit: Option<PageArg>, offset: Option<PageArg>) -> String {
        self.common.limit_and_offset_sql(limit, offset)
    }

    fn select_from_dummy_table(&self) -> &'static str {
        self.common.select_from_dummy_table()
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
        // seq, name, file
        let row = self.db().query_row("PRAGMA database_list", &[]).await?;
        scan(&row, 1)
    }

    async fn resolve_row_id(&self, table: &str, row_id: u64) -> u64 {
        self.common.resolve_row_id(table, row_id).await
    }

    fn client_statement_separator(&self) -> &'static str {
        self.common.client_statement_separator()
    }

    fn column_equality(&self, field_db_name: &str, column: &str) -> bool {
        self.common.column_equality(field_db_name, column)
    }

    fn byte_limit(&self) -> Option<usize> {
        None
    }
}
