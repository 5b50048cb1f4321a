//! Translation tables
//!
//! An ordered key/value view of a parsed translation block.

use indexmap::IndexMap;
use serde_json::Value;

use crate::block::locate_block;
use crate::error::Result;
use crate::literal::parse_object_body;

/// Ordered mapping from translation key to value
///
/// Values are normally strings. Other literal values are kept as-is so that
/// their keys still count as present when merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTable {
    entries: IndexMap<String, Value>,
}

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a block body (the text between the braces).
    pub fn from_body(body: &str) -> Result<Self> {
        let map = parse_object_body(body)?;
        Ok(Self {
            entries: map.into_iter().collect(),
        })
    }

    /// Locate the block declared as `identifier` in `source` and parse it.
    pub fn from_source(source: &str, identifier: &str) -> Result<Self> {
        let span = locate_block(source, identifier)?;
        Self::from_body(span.body(source))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Value of `key` if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Insert or replace an entry, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries of `self` whose key is absent from `base`, in `self`'s order.
    ///
    /// Only key presence matters: an entry whose key exists in `base` with a
    /// different value is not returned.
    pub fn missing_from(&self, base: &TranslationTable) -> Vec<(String, Value)> {
        self.entries
            .iter()
            .filter(|(key, _)| !base.contains_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl FromIterator<(String, Value)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_source() {
        let table =
            TranslationTable::from_source("x();\nconst i18n = {\n  a: 'A',\n  \"b\": \"B\",\n};", "i18n")
                .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_str("a"), Some("A"));
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_from_is_key_presence_only() {
        let base: TranslationTable = [("hello".to_string(), Value::from("Hello"))]
            .into_iter()
            .collect();
        let overlay = TranslationTable::from_body("hello: 'Hi', bye: 'Bye', later: 'Later'").unwrap();

        let missing = overlay.missing_from(&base);
        assert_eq!(
            missing,
            vec![
                ("bye".to_string(), Value::from("Bye")),
                ("later".to_string(), Value::from("Later")),
            ]
        );
    }

    #[test]
    fn test_non_string_values_count_as_present() {
        let base = TranslationTable::from_body("count: 3, nested: { a: 'b' }").unwrap();
        assert!(base.contains_key("count"));
        assert_eq!(base.get_str("count"), None);
        let overlay = TranslationTable::from_body("count: 'three'").unwrap();
        assert!(overlay.missing_from(&base).is_empty());
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut table = TranslationTable::from_body("a: '1', b: '2'").unwrap();
        table.insert("a", "one");
        assert_eq!(table.iter().next(), Some(("a", &Value::from("one"))));
    }
}
