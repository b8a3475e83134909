//! Field type resolution shared by all dialects.
//!
//! [`parse_field_for_dialect`] normalizes a field into the pieces a dialect
//! needs to pick a column type. Every configuration read goes through
//! [`Dialect::tag_setting`] so dialect-qualified overrides apply.

use crate::dialect::Dialect;
use crate::field::{StructField, ValueType};

/// Size used when the field carries no usable `SIZE` setting.
pub const DEFAULT_SIZE: usize = 255;

/// Output of [`parse_field_for_dialect`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedType {
    /// Value type the dialect should infer a column type from.
    pub value: ValueType,
    /// Explicit column type; empty means "infer from `value`".
    pub sql_type: String,
    /// Size hint for sized types.
    pub size: usize,
    /// `NOT NULL`, `UNIQUE`, `DEFAULT …` and `COMMENT …` fragments.
    pub additional_type: String,
}

/// Resolves `field` for `dialect`.
#[must_use]
pub fn parse_field_for_dialect(field: &StructField, dialect: &dyn Dialect) -> ResolvedType {
    let mut value = field.value_type.indirect().clone();

    let mut sql_type = match value.as_custom().and_then(|c| c.data_type(dialect)) {
        Some(data_type) => data_type,
        None => dialect.tag_setting(field, "TYPE").unwrap_or_default(),
    };

    if sql_type.is_empty() {
        // Scanner wrappers are stored as their first field.
        while let Some(inner) = value.as_custom().and_then(|c| c.scanned_value()) {
            value = inner;
        }
    }

    let size = dialect
        .tag_setting(field, "SIZE")
        .and_then(|num| num.trim().parse().ok())
        .unwrap_or(DEFAULT_SIZE);

    let mut additional_type = format!(
        "{} {}",
        dialect.tag_setting(field, "NOT NULL").unwrap_or_default(),
        dialect.tag_setting(field, "UNIQUE").unwrap_or_default()
    );
    if let Some(default) = dialect.tag_setting(field, "DEFAULT") {
        additional_type.push_str(" DEFAULT ");
        additional_type.push_str(&default);
    }
    if let Some(comment) = dialect.tag_setting(field, "COMMENT") {
        additional_type.push_str(" COMMENT ");
        additional_type.push_str(&comment);
    }

    // Keep `sql_type` trimmed so an all-blank TYPE tag still means "infer".
    sql_type = sql_type.trim().to_string();

    ResolvedType {
        value,
        sql_type,
        size,
        additional_type: additional_type.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::CommonDialect;
    use crate::field::{CustomType, IntWidth};
    use crate::mock::MockConnection;
    use std::sync::Arc;

    fn dialect() -> CommonDialect {
        CommonDialect::new(Arc::new(MockConnection::new()))
    }

    #[derive(Debug)]
    struct Point;

    impl CustomType for Point {
        fn type_name(&self) -> &str {
            "Point"
        }

        fn data_type(&self, dialect: &dyn Dialect) -> Option<String> {
            (dialect.name() == "common").then(|| "POINT".to_string())
        }
    }

    #[test]
    fn test_string_defaults_to_size_255() {
        let field = StructField::of::<String>("name");
        let resolved = parse_field_for_dialect(&field, &dialect());
        assert_eq!(resolved.size, 255);
        assert_eq!(resolved.sql_type, "");
        assert_eq!(resolved.value, ValueType::String);
        assert_eq!(resolved.additional_type, "");
    }

    #[test]
    fn test_size_tag() {
        let field = StructField::of::<String>("name").tag("SIZE", "64");
        assert_eq!(parse_field_for_dialect(&field, &dialect()).size, 64);
    }

    #[test]
    fn test_unparseable_size_falls_back() {
        let field = StructField::of::<String>("name").tag("SIZE", "big");
        assert_eq!(parse_field_for_dialect(&field, &dialect()).size, 255);
    }

    #[test]
    fn test_dialect_scoped_size() {
        let field = StructField::of::<String>("name")
            .tag("COMMON SIZE", "80")
            .tag("SIZE", "40");
        assert_eq!(parse_field_for_dialect(&field, &dialect()).size, 80);
    }

    #[test]
    fn test_pointer_is_unwrapped() {
        let field = StructField::of::<Option<Option<i32>>>("age");
        let resolved = parse_field_for_dialect(&field, &dialect());
        assert_eq!(resolved.value, ValueType::Int(IntWidth::W32));
    }

    #[test]
    fn test_type_tag() {
        let field = StructField::of::<String>("bio").tag("TYPE", "TEXT");
        assert_eq!(parse_field_for_dialect(&field, &dialect()).sql_type, "TEXT");
    }

    #[test]
    fn test_custom_data_type_overrides_tag() {
        let field = StructField::new("location", ValueType::custom(Point)).tag("TYPE", "TEXT");
        assert_eq!(parse_field_for_dialect(&field, &dialect()).sql_type, "POINT");
    }

    #[test]
    fn test_scanner_wrappers_are_descended() {
        let inner = ValueType::scanner("Inner", ValueType::Uint(IntWidth::W64));
        let field = StructField::new("id", ValueType::scanner("Outer", inner));
        let resolved = parse_field_for_dialect(&field, &dialect());
        assert_eq!(resolved.value, ValueType::Uint(IntWidth::W64));
    }

    #[test]
    fn test_scanner_kept_when_type_is_explicit() {
        let field = StructField::new(
            "id",
            ValueType::scanner("Key", ValueType::Uint(IntWidth::W64)),
        )
        .tag("TYPE", "NUMBER(19)");
        let resolved = parse_field_for_dialect(&field, &dialect());
        assert_eq!(resolved.value.type_name(), "Key");
        assert_eq!(resolved.sql_type, "NUMBER(19)");
    }

    #[test]
    fn test_additional_type() {
        let field = StructField::of::<String>("email")
            .tag("NOT NULL", "NOT NULL")
            .tag("UNIQUE", "UNIQUE")
            .tag("DEFAULT", "'x'")
            .tag("COMMENT", "'contact'");
        assert_eq!(
            parse_field_for_dialect(&field, &dialect()).additional_type,
            "NOT NULL UNIQUE DEFAULT 'x' COMMENT 'contact'"
        );
    }

    #[test]
    fn test_additional_type_is_trimmed() {
        let field = StructField::of::<String>("email").tag("UNIQUE", "UNIQUE");
        assert_eq!(
            parse_field_for_dialect(&field, &dialect()).additional_type,
            "UNIQUE"
        );
    }
}
