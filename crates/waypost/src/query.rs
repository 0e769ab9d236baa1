//! Query string and url-encoded body decoding.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;
use url::form_urlencoded;

/// The value(s) bound to one query key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// The key appeared once.
    Single(String),
    /// The key appeared more than once, values in order of appearance.
    Multiple(Vec<String>),
}

impl QueryValue {
    /// Returns the first value.
    pub fn first(&self) -> &str {
        match self {
            Self::Single(v) => v,
            // Multiple is only ever built from two or more values.
            Self::Multiple(values) => values.first().map_or("", String::as_str),
        }
    }

    /// Returns every value.
    pub fn all(&self) -> Vec<&str> {
        match self {
            Self::Single(v) => vec![v.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

/// Decoded `key=value` pairs from a query string or form body.
///
/// Repeated keys collect into [`QueryValue::Multiple`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query {
    values: BTreeMap<String, QueryValue>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` string.
    ///
    /// ```
    /// use waypost::Query;
    ///
    /// let query = Query::parse("name=John+Doe&tag=a&tag=b");
    /// assert_eq!(query.get("name"), Some("John Doe"));
    /// assert_eq!(query.get_all("tag"), vec!["a", "b"]);
    /// ```
    pub fn parse(input: &str) -> Self {
        Self::parse_bytes(input.as_bytes())
    }

    /// Decodes url-encoded bytes, e.g. a request body.
    pub fn parse_bytes(input: &[u8]) -> Self {
        let mut query = Self::new();
        for (key, value) in form_urlencoded::parse(input) {
            query.append(key.into_owned(), value.into_owned());
        }
        query
    }

    /// Adds a value, turning the entry into a sequence if the key exists.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.values.entry(key.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => {
                entry.insert(QueryValue::Single(value));
            }
        }
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(QueryValue::first)
    }

    /// Returns every value for `key`; empty if absent.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.values.get(key).map(QueryValue::all).unwrap_or_default()
    }

    /// Returns the raw entry for `key`.
    pub fn value(&self, key: &str) -> Option<&QueryValue> {
        self.values.get(key)
    }

    /// Returns `true` if no pairs were decoded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over keys and their values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
