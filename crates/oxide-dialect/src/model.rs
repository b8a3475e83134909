//! Primary-key adapter and base model columns.

use std::fmt;

use tracing::debug;

use crate::field::{FieldType, IntWidth, StructField, ValueType};
use crate::value::SqlValue;

/// A primary key that accepts whatever numeric shape the driver returns.
///
/// Drivers without a native unsigned type report generated keys as floats or
/// signed integers; all of them end up as the canonical `u64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimaryKey {
    /// Canonical key value.
    pub id: u64,
}

impl PrimaryKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    /// Reads a driver value into the key.
    ///
    /// Unsigned integers are taken as is, floats are truncated and signed
    /// integers are reinterpreted. Any other shape is ignored and leaves the
    /// key untouched.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scan(&mut self, src: &SqlValue) {
        match src {
            SqlValue::Uint(id) => self.id = *id,
            SqlValue::Float(id) => self.id = *id as u64,
            SqlValue::Int(id) => self.id = *id as u64,
            other => debug!(shape = other.shape(), "ignoring primary key value"),
        }
    }

    /// Returns the value written to the driver.
    #[must_use]
    pub const fn value(&self) -> SqlValue {
        SqlValue::Uint(self.id)
    }
}

impl From<u64> for PrimaryKey {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl FieldType for PrimaryKey {
    fn value_type() -> ValueType {
        ValueType::scanner("PrimaryKey", ValueType::Uint(IntWidth::Size))
    }
}

/// Columns shared by every model: `id`, `created_at`, `updated_at` and the
/// soft-delete marker `deleted_at`.
#[must_use]
pub fn base_model_fields() -> Vec<StructField> {
    type Timestamp = chrono::DateTime<chrono::Utc>;

    vec![
        StructField::of::<PrimaryKey>("ID").primary_key(),
        StructField::of::<Timestamp>("CreatedAt"),
        StructField::of::<Timestamp>("UpdatedAt"),
        StructField::of::<Option<Timestamp>>("DeletedAt").tag("INDEX", "INDEX"),
    ]
}
