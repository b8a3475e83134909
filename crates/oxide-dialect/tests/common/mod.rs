#![allow(dead_code)]

use std::sync::Arc;

use oxide_dialect::{resolve_dialect, Dialect, MockConnection, StructField};

pub fn common_dialect() -> Box<dyn Dialect> {
    resolve_dialect("common", Arc::new(MockConnection::new()))
}

pub fn column_type(dialect: &dyn Dialect, field: StructField) -> String {
    let mut field = field;
    dialect
        .column_type(&mut field)
        .unwrap_or_else(|e| panic!("Failed to resolve {}: {e}", field.name))
}
