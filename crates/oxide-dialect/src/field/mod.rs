//! Field metadata consumed by dialects.
//!
//! A [`StructField`] is what the model/tag parser hands over for one column:
//! names, the declared [`ValueType`], the primary-key flag and the raw
//! [`TagSettings`]. Rust types describe themselves through [`FieldType`], and
//! types that need to steer column-type inference implement [`CustomType`].

mod tags;

pub use tags::{tag_setting, TagSettings};

use std::fmt;
use std::sync::Arc;

use crate::dialect::Dialect;

/// Width of an integer value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    /// 8-bit.
    W8,
    /// 16-bit.
    W16,
    /// 32-bit.
    W32,
    /// 64-bit.
    W64,
    /// Pointer-sized (`isize`/`usize`).
    Size,
}

/// Width of a floating point value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    /// 32-bit.
    F32,
    /// 64-bit.
    F64,
}

/// Opt-in extension point for value types that are not plain scalars.
///
/// A custom type can insist on its own column type per dialect, or declare
/// itself a scanner wrapper whose storable value is another value type (a key
/// wrapper around an unsigned integer, for instance).
pub trait CustomType: fmt::Debug + Send + Sync {
    /// Name of the type, used in diagnostics.
    fn type_name(&self) -> &str;

    /// Column type this value requires on `dialect`, if it dictates one.
    fn data_type(&self, _dialect: &dyn Dialect) -> Option<String> {
        None
    }

    /// The value actually stored, for scanner wrappers.
    fn scanned_value(&self) -> Option<ValueType> {
        None
    }
}

/// A scanner wrapper: stored as its inner value type.
#[derive(Debug)]
struct Scanner {
    name: String,
    inner: ValueType,
}

impl CustomType for Scanner {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn scanned_value(&self) -> Option<ValueType> {
        Some(self.inner.clone())
    }
}

/// Declared value type of a field.
#[derive(Debug, Clone)]
pub enum ValueType {
    /// Boolean.
    Bool,
    /// Signed integer.
    Int(IntWidth),
    /// Unsigned integer.
    Uint(IntWidth),
    /// Floating point number.
    Float(FloatWidth),
    /// Text.
    String,
    /// Date and time.
    Time,
    /// Raw byte sequence.
    Bytes,
    /// Byte sequence holding a UUID.
    Uuid,
    /// Byte sequence holding a JSON document.
    Json,
    /// A plain struct with no column mapping of its own.
    Struct(String),
    /// Nullable indirection to another value type.
    Pointer(Box<ValueType>),
    /// A type implementing [`CustomType`].
    Custom(Arc<dyn CustomType>),
}

impl ValueType {
    /// Wraps `inner` in a nullable indirection.
    #[must_use]
    pub fn pointer(inner: Self) -> Self {
        Self::Pointer(Box::new(inner))
    }

    /// Wraps a custom type.
    #[must_use]
    pub fn custom(custom: impl CustomType + 'static) -> Self {
        Self::Custom(Arc::new(custom))
    }

    /// A scanner wrapper named `name` that stores `inner`.
    #[must_use]
    pub fn scanner(name: impl Into<String>, inner: Self) -> Self {
        Self::custom(Scanner {
            name: name.into(),
            inner,
        })
    }

    /// Follows pointer indirection down to the underlying value type.
    #[must_use]
    pub fn indirect(&self) -> &Self {
        let mut current = self;
        while let Self::Pointer(inner) = current {
            current = inner;
        }
        current
    }

    /// Returns the custom type, if this is one.
    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomType> {
        match self {
            Self::Custom(custom) => Some(custom.as_ref()),
            _ => None,
        }
    }

    /// Returns the kind of the value type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::String => "string",
            Self::Time | Self::Struct(_) | Self::Custom(_) => "struct",
            Self::Bytes | Self::Uuid | Self::Json => "slice",
            Self::Pointer(_) => "ptr",
        }
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Bool => "bool".to_string(),
            Self::Int(w) => format!("i{}", width_suffix(*w)),
            Self::Uint(w) => format!("u{}", width_suffix(*w)),
            Self::Float(FloatWidth::F32) => "f32".to_string(),
            Self::Float(FloatWidth::F64) => "f64".to_string(),
            Self::String => "String".to_string(),
            Self::Time => "DateTime".to_string(),
            Self::Bytes => "Vec<u8>".to_string(),
            Self::Uuid => "Uuid".to_string(),
            Self::Json => "Json".to_string(),
            Self::Struct(name) => name.clone(),
            Self::Pointer(inner) => format!("Option<{}>", inner.type_name()),
            Self::Custom(custom) => custom.type_name().to_string(),
        }
    }
}

const fn width_suffix(width: IntWidth) -> &'static str {
    match width {
        IntWidth::W8 => "8",
        IntWidth::W16 => "16",
        IntWidth::W32 => "32",
        IntWidth::W64 => "64",
        IntWidth::Size => "size",
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool, Self::Bool)
            | (Self::String, Self::String)
            | (Self::Time, Self::Time)
            | (Self::Bytes, Self::Bytes)
            | (Self::Uuid, Self::Uuid)
            | (Self::Json, Self::Json) => true,
            (Self::Int(a), Self::Int(b)) | (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            (Self::Pointer(a), Self::Pointer(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.type_name() == b.type_name(),
            _ => false,
        }
    }
}

/// Rust types that know their declared [`ValueType`].
pub trait FieldType {
    /// Returns the value type of `Self`.
    fn value_type() -> ValueType;
}

macro_rules! impl_field_type {
    ($($ty:ty => $value:expr),* $(,)?) => {
        $(
            impl FieldType for $ty {
                fn value_type() -> ValueType {
                    $value
                }
            }
        )*
    };
}

impl_field_type! {
    bool => ValueType::Bool,
    i8 => ValueType::Int(IntWidth::W8),
    i16 => ValueType::Int(IntWidth::W16),
    i32 => ValueType::Int(IntWidth::W32),
    i64 => ValueType::Int(IntWidth::W64),
    isize => ValueType::Int(IntWidth::Size),
    u8 => ValueType::Uint(IntWidth::W8),
    u16 => ValueType::Uint(IntWidth::W16),
    u32 => ValueType::Uint(IntWidth::W32),
    u64 => ValueType::Uint(IntWidth::W64),
    usize => ValueType::Uint(IntWidth::Size),
    f32 => ValueType::Float(FloatWidth::F32),
    f64 => ValueType::Float(FloatWidth::F64),
    String => ValueType::String,
    Vec<u8> => ValueType::Bytes,
    chrono::NaiveDateTime => ValueType::Time,
    uuid::Uuid => ValueType::Uuid,
    serde_json::Value => ValueType::Json,
}

impl<Tz: chrono::TimeZone> FieldType for chrono::DateTime<Tz> {
    fn value_type() -> ValueType {
        ValueType::Time
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn value_type() -> ValueType {
        ValueType::pointer(T::value_type())
    }
}

/// Metadata of one model field.
#[derive(Debug, Clone)]
pub struct StructField {
    /// Field name in the model.
    pub name: String,
    /// Column name in the database.
    pub db_name: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Whether the field is (part of) the primary key.
    pub is_primary_key: bool,
    /// Tag settings of the field.
    pub tag_settings: TagSettings,
}

impl StructField {
    /// Creates field metadata; the column name is derived from `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        let name = name.into();
        Self {
            db_name: to_db_name(&name),
            name,
            value_type,
            is_primary_key: false,
            tag_settings: TagSettings::new(),
        }
    }

    /// Creates field metadata for a Rust type.
    #[must_use]
    pub fn of<T: FieldType>(name: impl Into<String>) -> Self {
        Self::new(name, T::value_type())
    }

    /// Sets the column name.
    #[must_use]
    pub fn db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    /// Marks the field as primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Adds a tag setting.
    #[must_use]
    pub fn tag(mut self, key: &str, value: impl Into<String>) -> Self {
        self.tag_settings.set(key, value);
        self
    }

    /// Returns whether the declared type is nullable.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self.value_type, ValueType::Pointer(_))
    }
}

/// Converts a field name to its default column name (`UserID` → `user_id`).
#[must_use]
pub fn to_db_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let after_lower = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let acronym_end = prev.is_some_and(char::is_uppercase)
                && chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if (after_lower || acronym_end) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
