//! Identifier shortening and key-name construction.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use sha1::{Digest, Sha1};

use crate::dialect::Dialect;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-zA-Z0-9]+").expect("static regex is valid"));

/// Shortens `name` to at most `max_len` characters.
///
/// Names that already fit are returned unchanged. Longer names are replaced by
/// the hex SHA-1 digest of the name, truncated to `max_len - 1` characters when
/// the digest itself does not fit. The result depends only on the input, so
/// every schema operation agrees on the generated name. Distinct long names can
/// collide after truncation.
#[must_use]
pub fn shorten_identifier(name: &str, max_len: usize) -> Cow<'_, str> {
    if name.chars().count() <= max_len {
        return Cow::Borrowed(name);
    }

    let digest = hex::encode(Sha1::digest(name.as_bytes()));
    if digest.len() <= max_len {
        Cow::Owned(digest)
    } else {
        Cow::Owned(digest[..max_len.saturating_sub(1)].to_string())
    }
}

/// Builds a constraint or index name: `<kind>_<table>_<field>…`, with every
/// run of non-alphanumeric characters collapsed to `_`.
#[must_use]
pub fn build_key_name(kind: &str, table: &str, fields: &[&str]) -> String {
    let key_name = format!("{kind}_{table}_{}", fields.join("_"));
    NON_ALPHANUMERIC.replace_all(&key_name, "_").into_owned()
}

/// Splits `db.table` into its parts.
///
/// A name without a database qualifier is paired with the dialect's current
/// database.
///
/// # Errors
///
/// Propagates the error of [`Dialect::current_database`].
pub async fn split_database_and_table(
    dialect: &dyn Dialect,
    table: &str,
) -> crate::Result<(String, String)> {
    match table.split_once('.') {
        Some((database, table)) => Ok((database.to_string(), table.to_string())),
        None => Ok((dialect.current_database().await?, table.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_unchanged() {
        assert_eq!(shorten_identifier("users", 30), "users");
        let exactly = "a".repeat(30);
        assert_eq!(shorten_identifier(&exactly, 30), exactly.as_str());
    }

    #[test]
    fn test_long_name_hashed_and_truncated() {
        let name = "idx_user_accounts_on_email_and_created_at";
        let short = shorten_identifier(name, 30);
        // A SHA-1 hex digest is 40 characters, one under the limit is kept.
        assert_eq!(short.len(), 29);
        assert!(short.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(short, shorten_identifier(name, 30));
    }

    #[test]
    fn test_digest_fits_untruncated() {
        let name = "x".repeat(50);
        let short = shorten_identifier(&name, 45);
        assert_eq!(short.len(), 40);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 30 characters, 60 bytes.
        let name = "é".repeat(30);
        assert_eq!(shorten_identifier(&name, 30), name.as_str());
    }

    #[test]
    fn test_build_key_name() {
        assert_eq!(
            build_key_name("idx", "users", &["email", "created_at"]),
            "idx_users_email_created_at"
        );
        assert_eq!(
            build_key_name("fk", "public.orders", &["user id"]),
            "fk_public_orders_user_id"
        );
    }
}
