//! # oxide-dialect-oracle
//!
//! Oracle support for `oxide-dialect`, registered under the name `oci8`.
//!
//! # How Oracle differs from other dialects
//!
//! - **Identifier length**: identifiers are limited to 30 characters. Longer
//!   names are replaced by a truncated SHA-1 digest when quoted, and every
//!   quoted identifier is upper-cased.
//! - **Placeholders**: positional `:1`, `:2`, ...
//! - **Pagination**: `OFFSET n ROWS FETCH NEXT m ROWS ONLY`; a fetch clause
//!   always needs an offset.
//! - **No boolean type**: booleans are stored as `CHAR(1)`.
//! - **Identity and sequences**: small integer keys use
//!   `GENERATED ALWAYS AS IDENTITY`, 64-bit keys are fed from a sequence.
//! - **Row identifiers**: an insert reports a `ROWID`, which is resolved to the
//!   primary key with an extra lookup.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use oxide_dialect::{resolve_dialect, Dialect, MockConnection, PageArg};
//!
//! oxide_dialect_oracle::register();
//! let dialect = resolve_dialect("oci8", Arc::new(MockConnection::new()));
//!
//! assert_eq!(dialect.bind_var(2), ":2");
//! assert_eq!(dialect.quote("users"), "\"USERS\"");
//! assert_eq!(
//!     dialect.limit_and_offset_sql(Some(PageArg::from(10)), Some(PageArg::from(5))),
//!     " OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY"
//! );
//! ```

mod dialect;

pub use dialect::{Oci8Dialect, BYTE_LIMIT, MAX_IDENTIFIER_LENGTH};

/// Registers the `oci8` dialect.
pub fn register() {
    oxide_dialect::register_dialect("oci8", Oci8Dialect::bind);
}
