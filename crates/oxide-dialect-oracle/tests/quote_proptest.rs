use std::sync::Arc;

use oxide_dialect::{Dialect, MockConnection};
use oxide_dialect_oracle::{Oci8Dialect, MAX_IDENTIFIER_LENGTH};
use proptest::prelude::*;

fn unquote(quoted: &str) -> &str {
    quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or_else(|| panic!("not quoted: {quoted}"))
}

proptest! {
    #[test]
    fn short_identifiers_are_only_case_folded(name in "[a-z_][a-z0-9_]{0,29}") {
        let dialect = Oci8Dialect::new(Arc::new(MockConnection::new()));
        let quoted = dialect.quote(&name);
        prop_assert_eq!(unquote(&quoted), name.to_uppercase());
    }

    #[test]
    fn long_identifiers_fit_the_limit(name in "[a-z_][a-z0-9_]{30,90}") {
        let dialect = Oci8Dialect::new(Arc::new(MockConnection::new()));
        let quoted = dialect.quote(&name);
        prop_assert!(unquote(&quoted).chars().count() <= MAX_IDENTIFIER_LENGTH);
        prop_assert_eq!(&quoted, &dialect.quote(&name));
    }
}
