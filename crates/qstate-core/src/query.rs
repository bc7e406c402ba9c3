//! Raw query snapshots
//!
//! A [`RawQuery`] is the flat `name -> decoded string` view of a location's
//! search component, captured at one point in time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat mapping of query field name to decoded raw value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawQuery(BTreeMap<String, String>);

impl RawQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize a search string (`?a=1&b=x%20y`).
    ///
    /// - a leading `?` is ignored
    /// - pairs split at the first `=`; a key without `=` maps to `""`
    /// - values are percent-decoded; `+` is kept as-is
    /// - a value that does not decode to UTF-8 is kept verbatim
    /// - pairs whose key is blank are skipped
    /// - on repeated keys the last one wins
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut params = BTreeMap::new();

        for pair in search.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.trim().is_empty() {
                continue;
            }
            let decoded = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            params.insert(key.to_string(), decoded);
        }

        Self(params)
    }

    /// Encode back into a search string without the leading `?`, keys in
    /// sorted order
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Builder form of [`RawQuery::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` onto this snapshot; keys in `other` win
    pub fn merge(&mut self, other: &RawQuery) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }
}

impl From<BTreeMap<String, String>> for RawQuery {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<RawQuery> for BTreeMap<String, String> {
    fn from(query: RawQuery) -> Self {
        query.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let q = RawQuery::parse("?page=2&tags=a,b");
        assert_eq!(q.get("page"), Some("2"));
        assert_eq!(q.get("tags"), Some("a,b"));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_parse_percent_decodes_values() {
        let q = RawQuery::parse("q=hello%20world&plus=a+b");
        assert_eq!(q.get("q"), Some("hello world"));
        assert_eq!(q.get("plus"), Some("a+b"));
    }

    #[test]
    fn test_parse_key_without_value() {
        let q = RawQuery::parse("flag&x=1");
        assert_eq!(q.get("flag"), Some(""));
        assert_eq!(q.get("x"), Some("1"));
    }

    #[test]
    fn test_parse_skips_blank_keys() {
        let q = RawQuery::parse("&=3& =4&a=1&");
        assert_eq!(q.len(), 1);
        assert_eq!(q.get("a"), Some("1"));
    }

    #[test]
    fn test_parse_keeps_undecodable_value() {
        let q = RawQuery::parse("bad=%FF%FE");
        assert_eq!(q.get("bad"), Some("%FF%FE"));
    }

    #[test]
    fn test_parse_value_with_equals() {
        let q = RawQuery::parse("expr=a=b");
        assert_eq!(q.get("expr"), Some("a=b"));
    }

    #[test]
    fn test_empty_search() {
        assert!(RawQuery::parse("").is_empty());
        assert!(RawQuery::parse("?").is_empty());
    }

    #[test]
    fn test_to_query_string_round_trips() {
        let q = RawQuery::new().with("q", "a b&c").with("page", "2");
        let text = q.to_query_string();
        assert_eq!(text, "page=2&q=a%20b%26c");
        assert_eq!(RawQuery::parse(&text), q);
    }
}
