//! # oxide-dialect
//!
//! Dialect resolution and column-type generation for ORMs that target several
//! SQL backends.
//!
//! This crate provides:
//! - The [`Dialect`] contract every backend implements: placeholders,
//!   identifier quoting, pagination clauses, column types and catalog
//!   introspection
//! - A process-wide registry mapping dialect names to constructors, with a
//!   generic fallback
//! - Field metadata ([`StructField`]) and the resolver turning it into the
//!   inputs of column-type inference
//! - Deterministic identifier shortening for backends with length limits
//!
//! ## Resolving a Dialect
//!
//! A dialect is bound to the connection it introspects:
//!
//! ```rust
//! use std::sync::Arc;
//! use oxide_dialect::{resolve_dialect, Dialect, MockConnection, StructField};
//!
//! let dialect = resolve_dialect("common", Arc::new(MockConnection::new()));
//!
//! let mut field = StructField::of::<String>("Email").tag("NOT NULL", "NOT NULL");
//! assert_eq!(dialect.column_type(&mut field).unwrap(), "VARCHAR(255) NOT NULL");
//! assert_eq!(dialect.quote(&field.db_name), "\"email\"");
//! ```
//!
//! ## Dialect-Specific Settings
//!
//! A tag prefixed with the upper-cased dialect name wins over the plain tag:
//!
//! ```rust
//! use oxide_dialect::{tag_setting, TagSettings};
//!
//! let settings: TagSettings = [("PG SIZE", "64"), ("SIZE", "255")].into_iter().collect();
//! assert_eq!(tag_setting(&settings, "pg", "SIZE").as_deref(), Some("64"));
//! assert_eq!(tag_setting(&settings, "mysql", "SIZE").as_deref(), Some("255"));
//! ```

pub mod conn;
pub mod dialect;
pub mod error;
pub mod field;
pub mod identifier;
pub mod mock;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod value;

pub use conn::{exec_ddl, query_count, SqlCommon};
pub use dialect::{ColumnType, CommonDialect, DerivedFacts, Dialect, PageArg};
pub use error::{DialectError, Result};
pub use field::{
    tag_setting, CustomType, FieldType, FloatWidth, IntWidth, StructField, TagSettings, ValueType,
};
pub use identifier::{build_key_name, shorten_identifier, split_database_and_table};
pub use mock::{MockConnection, RecordedStatement};
pub use model::{base_model_fields, PrimaryKey};
pub use registry::{
    lookup_dialect, register_dialect, registered_dialects, resolve_dialect,
    resolve_dialect_with_diagnostics, CompatibilityWarning, DialectConstructor,
};
pub use resolve::{parse_field_for_dialect, ResolvedType, DEFAULT_SIZE};
pub use value::{scan, FromSqlValue, Row, SqlValue};
