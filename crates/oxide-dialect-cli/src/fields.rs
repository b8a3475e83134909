//! Field definitions read from JSON.

use std::path::Path;

use anyhow::Context;
use oxide_dialect::{
    FieldType, FloatWidth, IntWidth, PrimaryKey, StructField, TagSettings, ValueType,
};
use serde::Deserialize;

/// One field of a field definition file.
///
/// ```json
/// {"name": "Email", "kind": "string", "tags": {"SIZE": "120", "NOT NULL": "NOT NULL"}}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub db_name: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub tags: TagSettings,
}

/// Maps a kind name to its value type. Unknown kinds become plain structs.
fn value_type(kind: &str) -> ValueType {
    match kind.to_ascii_lowercase().as_str() {
        "bool" => ValueType::Bool,
        "i8" => ValueType::Int(IntWidth::W8),
        "i16" => ValueType::Int(IntWidth::W16),
        "i32" | "int" => ValueType::Int(IntWidth::W32),
        "i64" => ValueType::Int(IntWidth::W64),
        "u8" => ValueType::Uint(IntWidth::W8),
        "u16" => ValueType::Uint(IntWidth::W16),
        "u32" | "uint" => ValueType::Uint(IntWidth::W32),
        "u64" => ValueType::Uint(IntWidth::W64),
        "f32" => ValueType::Float(FloatWidth::F32),
        "f64" | "float" => ValueType::Float(FloatWidth::F64),
        "string" | "text" => ValueType::String,
        "time" | "datetime" => ValueType::Time,
        "bytes" => ValueType::Bytes,
        "uuid" => ValueType::Uuid,
        "json" => ValueType::Json,
        "primary_key" => PrimaryKey::value_type(),
        _ => ValueType::Struct(kind.to_string()),
    }
}

impl From<FieldSpec> for StructField {
    fn from(spec: FieldSpec) -> Self {
        let mut value = value_type(&spec.kind);
        if spec.nullable {
            value = ValueType::pointer(value);
        }
        let mut field = StructField::new(spec.name, value);
        if let Some(db_name) = spec.db_name {
            field = field.db_name(db_name);
        }
        field.is_primary_key = spec.primary_key;
        field.tag_settings = spec.tags;
        field
    }
}

/// Reads a JSON array of field definitions.
pub fn load(path: &Path) -> anyhow::Result<Vec<StructField>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let specs: Vec<FieldSpec> = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(specs.into_iter().map(StructField::from).collect())
}
