//! Per-field tag settings and their dialect-aware lookup.
//!
//! Any setting can be overridden for a single backend by prefixing the key
//! with the upper-cased dialect name: `"OCI8 SIZE"` wins over `"SIZE"` when the
//! `oci8` dialect reads it, and is invisible to every other dialect.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tag settings of a single field, keyed by upper-case setting name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct TagSettings {
    entries: BTreeMap<String, String>,
}

impl TagSettings {
    /// Creates an empty set of tag settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize_key(key)).map(String::as_str)
    }

    /// Returns the value of the first key in `keys` that is present.
    #[must_use]
    pub fn get_first(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// Returns whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(normalize_key(key), value.into());
    }

    /// Returns the number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for TagSettings {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<TagSettings> for BTreeMap<String, String> {
    fn from(settings: TagSettings) -> Self {
        settings.entries
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for TagSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = Self::new();
        for (key, value) in iter {
            settings.set(key.as_ref(), value);
        }
        settings
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}

/// Looks up `key` for the dialect named `dialect`.
///
/// The dialect-qualified key `"<DIALECT> <KEY>"` takes precedence over the
/// bare key. Reading never modifies the settings.
#[must_use]
pub fn tag_setting(settings: &TagSettings, dialect: &str, key: &str) -> Option<String> {
    let qualified = format!("{} {}", dialect.to_uppercase(), key);
    settings
        .get_first(&[qualified.as_str(), key])
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TagSettings {
        [("PG SIZE", "64"), ("SIZE", "255")].into_iter().collect()
    }

    #[test]
    fn test_dialect_key_takes_precedence() {
        assert_eq!(tag_setting(&settings(), "pg", "SIZE").as_deref(), Some("64"));
    }

    #[test]
    fn test_falls_back_to_bare_key() {
        assert_eq!(
            tag_setting(&settings(), "mysql", "SIZE").as_deref(),
            Some("255")
        );
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(tag_setting(&settings(), "pg", "TYPE"), None);
    }

    #[test]
    fn test_keys_are_case_normalized() {
        let mut tags = TagSettings::new();
        tags.set("not null", "NOT NULL");
        assert!(tags.contains("NOT NULL"));
        assert_eq!(tags.get("Not Null"), Some("NOT NULL"));
    }

    #[test]
    fn test_lookup_does_not_mutate() {
        let tags = settings();
        let before = tags.clone();
        let _ = tag_setting(&tags, "oci8", "SIZE");
        assert_eq!(tags, before);
    }

    #[test]
    fn test_deserialize_normalizes_keys() {
        let tags: TagSettings = serde_json::from_str(r#"{"oci8 size": "64"}"#).unwrap();
        assert_eq!(tag_setting(&tags, "oci8", "SIZE").as_deref(), Some("64"));
    }
}
