//! SQL Dialect support.
//!
//! Different databases disagree on placeholders, identifier limits,
//! pagination, column types and catalog queries. [`Dialect`] is the contract
//! every backend implements; a dialect instance is bound to one connection.

mod common;

pub use common::CommonDialect;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::conn::SqlCommon;
use crate::error::Result;
use crate::field::{tag_setting, StructField, TagSettings};

/// A `LIMIT`/`OFFSET` argument as handed over by the query builder.
///
/// Values that do not parse as an integer are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageArg {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Textual number, e.g. from a request parameter.
    Text(String),
}

impl PageArg {
    /// Parses the argument.
    ///
    /// Text accepts an optional sign and a `0x`, `0o` or `0b` radix prefix.
    #[must_use]
    pub fn parse(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Uint(n) => i64::try_from(*n).ok(),
            Self::Text(text) => parse_int(text),
        }
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        Some("0o" | "0O") => (8, &unsigned[2..]),
        Some("0b" | "0B") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

macro_rules! page_arg_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PageArg {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

page_arg_from! {
    i64 => Int,
    i32 => Int,
    u64 => Uint,
    u32 => Uint,
    String => Text,
    &str => Text,
}

impl From<usize> for PageArg {
    fn from(value: usize) -> Self {
        Self::Uint(value as u64)
    }
}

/// Facts learned while inferring a column type.
///
/// They are returned to the caller instead of being written into the field;
/// [`Dialect::column_type`] persists them into the field's tag settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedFacts {
    /// Value for the `AUTO_INCREMENT` setting (identity clause in use).
    pub auto_increment: Option<String>,
    /// The column is fed from a sequence (`SEQUENCE` setting).
    pub sequence: bool,
}

impl DerivedFacts {
    /// Returns whether nothing was learned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.auto_increment.is_none() && !self.sequence
    }

    /// Records the facts into `settings`. Applying twice has no further effect.
    pub fn apply(&self, settings: &mut TagSettings) {
        if let Some(value) = &self.auto_increment {
            settings.set("AUTO_INCREMENT", value.clone());
        }
        if self.sequence {
            settings.set("SEQUENCE", "SEQUENCE");
        }
    }
}

/// A fully inferred column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    /// The column's SQL type.
    pub sql_type: String,
    /// Constraint fragments appended after the type.
    pub additional_type: String,
    /// Facts to record on the field.
    pub facts: DerivedFacts,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.additional_type.trim().is_empty() {
            f.write_str(&self.sql_type)
        } else {
            write!(f, "{} {}", self.sql_type, self.additional_type)
        }
    }
}

/// Behaviour that differs across SQL databases.
#[async_trait]
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the connection this dialect is bound to.
    fn db(&self) -> &Arc<dyn SqlCommon>;

    /// Returns the placeholder for the `ordinal`-th (1-based) argument.
    fn bind_var(&self, ordinal: usize) -> String;

    /// Quotes an identifier.
    fn quote(&self, key: &str) -> String;

    /// Infers the column type of `field` without touching it.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnsupportedType`](crate::DialectError::UnsupportedType)
    /// when the value type has no mapping on this backend.
    fn resolve_column_type(&self, field: &StructField) -> Result<ColumnType>;

    /// Checks whether an index exists.
    async fn has_index(&self, table: &str, index: &str) -> Result<bool>;

    /// Checks whether a foreign key constraint exists.
    async fn has_foreign_key(&self, table: &str, foreign_key: &str) -> Result<bool>;

    /// Drops an index.
    async fn remove_index(&self, table: &str, index: &str) -> Result<()>;

    /// Drops a constraint.
    async fn remove_constraint(&self, table: &str, constraint: &str) -> Result<()>;

    /// Checks whether a table exists.
    async fn has_table(&self, table: &str) -> Result<bool>;

    /// Checks whether a column exists.
    async fn has_column(&self, table: &str, column: &str) -> Result<bool>;

    /// Changes a column's type.
    async fn modify_column(&self, table: &str, column: &str, typ: &str) -> Result<()>;

    /// Makes a column nullable.
    async fn drop_nullable(&self, table: &str, column: &str, typ: &str) -> Result<()>;

    /// Renders the pagination clause for `limit` and `offset`.
    fn limit_and_offset_sql(&self, limit: Option<PageArg>, offset: Option<PageArg>) -> String;

    /// Suffix for selecting a constant, e.g. `FROM DUAL`.
    fn select_from_dummy_table(&self) -> &'static str;

    /// Suffix appended to an insert to return the generated key.
    fn last_insert_id_returning_suffix(&self, table: &str, column: &str) -> String;

    /// Insert body used when no column has a value.
    fn default_value_str(&self) -> &'static str;

    /// Builds a constraint or index name for `fields` of `table`.
    fn build_key_name(&self, kind: &str, table: &str, fields: &[&str]) -> String;

    /// Returns index and column names valid on this backend.
    fn normalize_index_and_column(&self, index: &str, column: &str) -> (String, String);

    /// Returns the name of the current database or schema.
    async fn current_database(&self) -> Result<String>;

    /// Resolves a row identifier returned by an insert to the primary key.
    ///
    /// Best effort: on failure the given `row_id` is returned.
    async fn resolve_row_id(&self, table: &str, row_id: u64) -> u64;

    /// Terminator appended to client statements.
    fn client_statement_separator(&self) -> &'static str;

    /// Checks whether a field's column name matches a catalog column name.
    fn column_equality(&self, field_db_name: &str, column: &str) -> bool;

    /// Maximum size of an inline binary value, `None` when unbounded.
    fn byte_limit(&self) -> Option<usize>;

    /// Reads a tag setting, honoring `"<DIALECT> <KEY>"` overrides.
    fn tag_setting(&self, field: &StructField, key: &str) -> Option<String> {
        tag_setting(&field.tag_settings, self.name(), key)
    }

    /// Returns whether `field` gets an auto-increment column.
    ///
    /// An explicit `AUTO_INCREMENT` setting decides (anything but `false`
    /// enables it); otherwise primary keys auto-increment.
    fn can_auto_increment(&self, field: &StructField) -> bool {
        match self.tag_setting(field, "AUTO_INCREMENT") {
            Some(value) => !value.eq_ignore_ascii_case("false"),
            None => field.is_primary_key,
        }
    }

    /// Returns the column type of `field` and records derived facts on it.
    ///
    /// # Errors
    ///
    /// See [`Dialect::resolve_column_type`].
    fn column_type(&self, field: &mut StructField) -> Result<String> {
        let column_type = self.resolve_column_type(field)?;
        column_type.facts.apply(&mut field.tag_settings);
        Ok(column_type.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_arg_parse() {
        assert_eq!(PageArg::from(10).parse(), Some(10));
        assert_eq!(PageArg::from("25").parse(), Some(25));
        assert_eq!(PageArg::from("0x10").parse(), Some(16));
        assert_eq!(PageArg::from("-1").parse(), Some(-1));
        assert_eq!(PageArg::from(u64::MAX).parse(), None);
        assert_eq!(PageArg::from("ten").parse(), None);
        assert_eq!(PageArg::from("").parse(), None);
        assert_eq!(PageArg::from("--1").parse(), None);
    }

    #[test]
    fn test_derived_facts_apply_idempotent() {
        let facts = DerivedFacts {
            auto_increment: Some("GENERATED ALWAYS".to_string()),
            sequence: true,
        };
        let mut settings = TagSettings::new();
        facts.apply(&mut settings);
        facts.apply(&mut settings);
        assert_eq!(settings.len(), 2);
        assert_eq!(settings.get("AUTO_INCREMENT"), Some("GENERATED ALWAYS"));
        assert_eq!(settings.get("SEQUENCE"), Some("SEQUENCE"));
    }

    #[test]
    fn test_column_type_display() {
        let mut column_type = ColumnType {
            sql_type: "NUMBER".to_string(),
            additional_type: String::new(),
            facts: DerivedFacts::default(),
        };
        assert_eq!(column_type.to_string(), "NUMBER");
        column_type.additional_type = "NOT NULL".to_string();
        assert_eq!(column_type.to_string(), "NUMBER NOT NULL");
    }
}
