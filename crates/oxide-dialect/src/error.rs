//! Error types for dialect resolution and catalog access.

use thiserror::Error;

use crate::field::ValueType;

/// Errors raised by dialects and the connections they are bound to.
#[derive(Debug, Error)]
pub enum DialectError {
    /// The field's value type has no column type on this backend.
    ///
    /// This is a configuration error: emitting an empty or guessed type would
    /// produce broken DDL, so schema generation must stop here.
    #[error("invalid sql type {type_name} ({kind}) for {dialect}")]
    UnsupportedType {
        /// Name of the dialect that rejected the type.
        dialect: &'static str,
        /// Name of the offending value type.
        type_name: String,
        /// Kind of the offending value type.
        kind: &'static str,
    },

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Error reported by a non-sqlx connection binding.
    #[error("connection error: {0}")]
    Connection(String),

    /// A returned column could not be converted to the requested type.
    #[error("cannot scan column {index} as {expected}: found {found}")]
    Scan {
        /// Zero-based column index.
        index: usize,
        /// Requested Rust type.
        expected: &'static str,
        /// Debug rendering of the value that was found.
        found: String,
    },

    /// The row has fewer columns than requested.
    #[error("column index {index} out of range for row of {len} columns")]
    ColumnOutOfRange {
        /// Requested column index.
        index: usize,
        /// Number of columns in the row.
        len: usize,
    },
}

impl DialectError {
    /// Builds the error for a value type `dialect` cannot map.
    #[must_use]
    pub fn unsupported_type(dialect: &'static str, value: &ValueType) -> Self {
        Self::UnsupportedType {
            dialect,
            type_name: value.type_name(),
            kind: value.kind(),
        }
    }

    /// Returns whether this error means the query matched no row.
    #[must_use]
    pub const fn is_row_not_found(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::RowNotFound))
    }
}

/// Result type alias for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message() {
        let err = DialectError::UnsupportedType {
            dialect: "oci8",
            type_name: "Address".to_string(),
            kind: "struct",
        };
        assert_eq!(err.to_string(), "invalid sql type Address (struct) for oci8");

        let err = DialectError::unsupported_type("common", &ValueType::Struct("Address".into()));
        assert_eq!(err.to_string(), "invalid sql type Address (struct) for common");
    }

    #[test]
    fn test_row_not_found() {
        assert!(DialectError::from(sqlx::Error::RowNotFound).is_row_not_found());
        assert!(!DialectError::Connection("reset".into()).is_row_not_found());
    }
}
