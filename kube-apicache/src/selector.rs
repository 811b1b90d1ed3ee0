//! Exact-match label selectors
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type Map = BTreeMap<String, String>;

/// A set of `key=value` pairs that must all be present on an object's labels
///
/// Matching is exact: no set-based operators, no existence-only checks.
/// Labels on the object that the selector does not mention are ignored,
/// and an empty selector matches every object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Selector(Map);

impl Selector {
    /// Whether every pair in the selector appears with an equal value in `labels`
    #[must_use]
    pub fn matches(&self, labels: &Map) -> bool {
        self.0.iter().all(|(key, value)| labels.get(key) == Some(value))
    }

    /// Indicates whether this selector matches every object
    #[must_use]
    pub fn selects_all(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the selector in the API's `k1=v1,k2=v2` form
    #[must_use]
    pub fn to_selector_string(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Adds or replaces a required label
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl From<Map> for Selector {
    fn from(map: Map) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Selector {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
