//! Process-wide dialect registry.
//!
//! Backends register a constructor under their name once at start-up;
//! [`resolve_dialect`] creates a fresh instance bound to the given connection
//! on every call. Names that were never registered fall back to the generic
//! [`CommonDialect`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::warn;

use crate::conn::SqlCommon;
use crate::dialect::{CommonDialect, Dialect};

/// Creates a dialect bound to a connection.
pub type DialectConstructor = fn(Arc<dyn SqlCommon>) -> Box<dyn Dialect>;

static REGISTRY: Lazy<Mutex<HashMap<String, DialectConstructor>>> = Lazy::new(|| {
    let mut dialects: HashMap<String, DialectConstructor> = HashMap::new();
    dialects.insert("common".to_string(), CommonDialect::bind);
    Mutex::new(dialects)
});

fn registry() -> MutexGuard<'static, HashMap<String, DialectConstructor>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Emitted when a dialect name is not registered and the generic dialect is
/// used instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityWarning {
    /// The requested dialect name.
    pub requested: String,
}

impl fmt::Display for CompatibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is not officially supported, running under compatibility mode",
            self.requested
        )
    }
}

/// Registers `constructor` under `name`, replacing any previous entry.
pub fn register_dialect(name: impl Into<String>, constructor: DialectConstructor) {
    registry().insert(name.into(), constructor);
}

/// Returns the constructor registered under `name`.
#[must_use]
pub fn lookup_dialect(name: &str) -> Option<DialectConstructor> {
    registry().get(name).copied()
}

/// Returns the names of all registered dialects, sorted.
#[must_use]
pub fn registered_dialects() -> Vec<String> {
    let mut names: Vec<String> = registry().keys().cloned().collect();
    names.sort();
    names
}

/// Resolves `name` to a new dialect bound to `db`, reporting a fallback.
pub fn resolve_dialect_with_diagnostics(
    name: &str,
    db: Arc<dyn SqlCommon>,
) -> (Box<dyn Dialect>, Option<CompatibilityWarning>) {
    if let Some(constructor) = lookup_dialect(name) {
        return (constructor(db), None);
    }

    let warning = CompatibilityWarning {
        requested: name.to_string(),
    };
    warn!(dialect = name, "{warning}");
    (CommonDialect::bind(db), Some(warning))
}

/// Resolves `name` to a new dialect bound to `db`.
///
/// Never fails: unknown names get the generic dialect.
#[must_use]
pub fn resolve_dialect(name: &str, db: Arc<dyn SqlCommon>) -> Box<dyn Dialect> {
    resolve_dialect_with_diagnostics(name, db).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnection;
    use crate::value::SqlValue;

    const CURRENT_DATABASE: &str = "SELECT DATABASE()";

    fn conn_for(database: &str) -> Arc<MockConnection> {
        Arc::new(
            MockConnection::new()
                .with_row(CURRENT_DATABASE, vec![SqlValue::Text(database.to_string())]),
        )
    }

    #[test]
    fn test_common_is_preregistered() {
        assert!(lookup_dialect("common").is_some());
        assert!(registered_dialects().contains(&"common".to_string()));
    }

    #[test]
    fn test_unknown_name_falls_back_with_warning() {
        let (dialect, warning) =
            resolve_dialect_with_diagnostics("cockroach", Arc::new(MockConnection::new()));
        assert_eq!(dialect.name(), "common");
        let warning = warning.unwrap();
        assert_eq!(warning.requested, "cockroach");
        assert_eq!(
            warning.to_string(),
            "`cockroach` is not officially supported, running under compatibility mode"
        );
        assert!(lookup_dialect("cockroach").is_none());
    }

    #[test]
    fn test_registered_name_has_no_warning() {
        let (dialect, warning) =
            resolve_dialect_with_diagnostics("common", Arc::new(MockConnection::new()));
        assert_eq!(dialect.name(), "common");
        assert!(warning.is_none());
    }

    #[tokio::test]
    async fn test_register_replaces() {
        fn bind_elsewhere(_db: Arc<dyn SqlCommon>) -> Box<dyn Dialect> {
            Box::new(CommonDialect::new(conn_for("replaced")))
        }
        register_dialect("registry-test", CommonDialect::bind);
        register_dialect("registry-test", bind_elsewhere);

        let dialect = resolve_dialect("registry-test", conn_for("original"));
        assert_eq!(dialect.current_database().await.unwrap(), "replaced");
    }

    #[tokio::test]
    async fn test_instances_are_bound_independently() {
        let first_conn = conn_for("first");
        let second_conn = conn_for("second");
        let first = resolve_dialect("common", first_conn.clone());
        let second = resolve_dialect("common", second_conn.clone());

        assert_eq!(first.current_database().await.unwrap(), "first");
        assert_eq!(second.current_database().await.unwrap(), "second");
        assert_eq!(first_conn.statements().len(), 1);
        assert_eq!(second_conn.statements().len(), 1);
    }
}
