//! Driver-neutral SQL values.
//!
//! Dialects bind [`SqlValue`]s as statement arguments and read them back from
//! the first row of catalog queries. Drivers disagree on the shape of numeric
//! results (an Oracle `COUNT(*)` may arrive as a float or even as text), so
//! scanning through [`FromSqlValue`] accepts every lossless representation.

/// A SQL value passed to or returned from a connection.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    Uint(u64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns a short name for the value's shape, used in scan errors.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

/// A row returned by [`SqlCommon::query_row`](crate::SqlCommon::query_row).
pub type Row = Vec<SqlValue>;

/// Trait for types that can be read out of a returned SQL value.
pub trait FromSqlValue: Sized {
    /// Rust type name reported in scan errors.
    const EXPECTED: &'static str;

    /// Converts the value, or returns `None` if its shape does not fit.
    fn from_sql_value(value: &SqlValue) -> Option<Self>;
}

impl FromSqlValue for i64 {
    const EXPECTED: &'static str = "i64";

    #[allow(clippy::cast_possible_truncation)]
    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Int(n) => Some(*n),
            SqlValue::Uint(n) => Self::try_from(*n).ok(),
            SqlValue::Bool(b) => Some(Self::from(*b)),
            SqlValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as Self),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromSqlValue for u64 {
    const EXPECTED: &'static str = "u64";

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Uint(n) => Some(*n),
            SqlValue::Int(n) => Self::try_from(*n).ok(),
            SqlValue::Float(f) if f.fract() == 0.0 && *f >= 0.0 && f.is_finite() => {
                Some(*f as Self)
            }
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromSqlValue for f64 {
    const EXPECTED: &'static str = "f64";

    #[allow(clippy::cast_precision_loss)]
    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Float(f) => Some(*f),
            SqlValue::Int(n) => Some(*n as Self),
            SqlValue::Uint(n) => Some(*n as Self),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromSqlValue for String {
    const EXPECTED: &'static str = "String";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Text(s) => Some(s.clone()),
            SqlValue::Blob(b) => Self::from_utf8(b.clone()).ok(),
            _ => None,
        }
    }
}

impl FromSqlValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_sql_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Int(n) => Some(*n != 0),
            SqlValue::Uint(n) => Some(*n != 0),
            _ => None,
        }
    }
}

/// Reads column `index` of `row` as `T`.
///
/// # Errors
///
/// Returns [`DialectError::ColumnOutOfRange`](crate::DialectError::ColumnOutOfRange)
/// for a missing column and [`DialectError::Scan`](crate::DialectError::Scan)
/// when the value's shape cannot be converted.
pub fn scan<T: FromSqlValue>(row: &[SqlValue], index: usize) -> crate::Result<T> {
    let value = row
        .get(index)
        .ok_or(crate::DialectError::ColumnOutOfRange {
            index,
            len: row.len(),
        })?;
    T::from_sql_value(value).ok_or_else(|| crate::DialectError::Scan {
        index,
        expected: T::EXPECTED,
        found: format!("{value:?}"),
    })
}
