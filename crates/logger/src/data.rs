//! Structured key-value data attached to loggers and messages

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map;

/// A single attached value.
///
/// Values are a closed sum type: strings, numbers, booleans, null, nested
/// maps and nested sequences.
pub type Datum = serde_json::Value;

/// Structured context attached to a logger or to an individual message.
///
/// `Data` is treated as immutable once it has been handed to a logger or a
/// message. Combining two maps always goes through [`merge_data`], which
/// allocates a new map and leaves its inputs untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Data(HashMap<String, Datum>);

impl Data {
    /// Create an empty map
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Builder-style insertion, replacing any previous value for `key`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Datum>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Datum>) -> Option<Datum> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&Datum> {
        self.0.get(key)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in unspecified order
    pub fn iter(&self) -> hash_map::Iter<'_, String, Datum> {
        self.0.iter()
    }

    /// Entries sorted by key, for deterministic rendering
    pub fn sorted(&self) -> Vec<(&str, &Datum)> {
        let mut entries: Vec<_> = self.0.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Overlay `other` on top of `self` and return the result
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        merge_data([self, other])
    }
}

/// Overlay maps left to right into a new map.
///
/// For a key present in several inputs the value from the last input wins.
/// `None` entries are skipped, and the result is an empty map (never absent)
/// when no input has entries. Runs in time linear in the total number of
/// entries and never aliases or mutates an input.
///
/// ```
/// use ember_logger::{Data, merge_data};
///
/// let parent = Data::new().with("a", 1).with("x", "y");
/// let call = Data::new().with("x", "z");
///
/// let merged = merge_data([Some(&parent), None, Some(&call)]);
/// assert_eq!(merged, Data::new().with("a", 1).with("x", "z"));
/// ```
pub fn merge_data<'a, I, D>(maps: I) -> Data
where
    I: IntoIterator<Item = D>,
    D: Into<Option<&'a Data>>,
{
    let maps: Vec<&Data> = maps.into_iter().filter_map(Into::into).collect();

    let capacity = maps.iter().map(|data| data.len()).sum();
    let mut merged = HashMap::with_capacity(capacity);

    for data in maps {
        for (key, value) in &data.0 {
            merged.insert(key.clone(), value.clone());
        }
    }

    Data(merged)
}

impl<K, V> FromIterator<(K, V)> for Data
where
    K: Into<String>,
    V: Into<Datum>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, Datum>> for Data {
    fn from(map: HashMap<String, Datum>) -> Self {
        Self(map)
    }
}

impl From<serde_json::Map<String, Datum>> for Data {
    fn from(map: serde_json::Map<String, Datum>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Data {
    type Item = (&'a String, &'a Datum);
    type IntoIter = hash_map::Iter<'a, String, Datum>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build a [`Data`] map from `key => value` pairs.
///
/// Values may be anything convertible into a [`Datum`]; use
/// `serde_json::json!` for nested maps and sequences.
///
/// ```
/// use ember_logger::data;
///
/// let data = data! { "a" => 42, "b" => "hello" };
/// assert_eq!(data.len(), 2);
/// ```
#[macro_export]
macro_rules! data {
    () => {
        $crate::Data::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Data::new()$(.with($key, $value))+
    };
}
