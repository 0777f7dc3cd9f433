//! Per-property natural-language maps.
//!
//! A language map coexists with the property slot it describes: `summary`
//! may hold a plain string while `summaryMap` carries per-language
//! translations of the same semantic field. The two are independent storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A mapping from BCP 47 language tag to a localized string value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct LanguageMap(BTreeMap<String, String>);

impl LanguageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The language tags present, in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The value for `tag`, or the empty string when absent.
    pub fn get(&self, tag: &str) -> &str {
        self.0.get(tag).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.0.insert(tag.into(), value.into());
    }

    pub fn remove(&mut self, tag: &str) -> Option<String> {
        self.0.remove(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn to_json(&self) -> Value {
        let entries: Map<String, Value> = self
            .0
            .iter()
            .map(|(tag, text)| (tag.clone(), Value::String(text.clone())))
            .collect();
        Value::Object(entries)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LanguageMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_tag_reads_as_empty_string() {
        let mut map = LanguageMap::new();
        map.set("en", "Hello");
        map.set("fr", "Bonjour");
        assert_eq!(map.get("en"), "Hello");
        assert_eq!(map.get("de"), "");
        assert_eq!(map.languages().collect::<Vec<_>>(), vec!["en", "fr"]);
    }

    #[test]
    fn deserializes_from_a_tag_keyed_object() {
        let map: LanguageMap = serde_json::from_value(json!({"en": "Hi", "ja": "こんにちは"})).unwrap();
        assert_eq!(map.get("ja"), "こんにちは");
        assert_eq!(map.to_json(), json!({"en": "Hi", "ja": "こんにちは"}));
    }

    #[test]
    fn rejects_non_string_entries() {
        assert!(serde_json::from_value::<LanguageMap>(json!({"en": 5})).is_err());
        assert!(serde_json::from_value::<LanguageMap>(json!("en")).is_err());
    }
}
