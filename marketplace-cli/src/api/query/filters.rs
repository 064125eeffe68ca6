//! Query-string filters
//!
//! Filters keep the order they were declared in so that identical screens
//! always produce identical requests. Blank values are never sent.

use serde::{Deserialize, Serialize};

/// Ordered `key -> value` filter set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    entries: Vec<(String, String)>,
}

/// Parameter names owned by pagination and sorting; never usable as filters
pub const RESERVED_KEYS: [&str; 4] = ["page", "page_size", "sort_by", "sort_order"];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter, replacing an earlier value for the same key in place
    ///
    /// A `None` or blank value removes the key. Reserved keys are ignored.
    pub fn set(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        let key = key.into();
        if is_reserved(&key) {
            log::warn!("Ignoring filter on reserved parameter '{}'", key);
            return;
        }
        let value = value.map(Into::into).filter(|v| !v.trim().is_empty());

        match (self.entries.iter().position(|(k, _)| *k == key), value) {
            (Some(idx), Some(value)) => self.entries[idx].1 = value,
            (Some(idx), None) => {
                self.entries.remove(idx);
            }
            (None, Some(value)) => self.entries.push((key, value)),
            (None, None) => {}
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Parse a `key=value` argument
    pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("filter '{}' must look like key=value", raw))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("filter '{}' has an empty key", raw));
        }
        if is_reserved(key) {
            return Err(format!(
                "'{}' is not a filter; use --{} instead",
                key,
                key.replace('_', "-")
            ));
        }
        Ok((key.to_string(), value.trim().to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut filters = Filters::new();
        for (key, value) in iter {
            filters.set(key, Some(value));
        }
        filters
    }
}
