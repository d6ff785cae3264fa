//! Filter translation
//!
//! Callers describe what they want as a list of `(field, value)` filters.
//! The translator folds them into a [`QueryMap`] that feeds both template
//! substitution and the outgoing query string.

use crate::error::ConnectorError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// A single caller-supplied filter
///
/// The operator is carried for host compatibility but the engine only
/// uses field name and value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Filter {
    #[serde(alias = "field")]
    pub field_name: String,
    pub value: String,
    #[serde(default)]
    pub operator: Option<String>,
}

impl Filter {
    /// Equality filter
    pub fn eq(field_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            value: value.into(),
            operator: None,
        }
    }

    /// Attach an operator (ignored by the engine)
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }
}

impl FromStr for Filter {
    type Err = ConnectorError;

    /// Parse `field=value`; only the first `=` splits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => {
                Ok(Filter::eq(field.trim(), value))
            }
            _ => Err(ConnectorError::ConfigError(format!(
                "invalid filter '{}', expected field=value",
                s
            ))),
        }
    }
}

/// Case-insensitive field name -> value map, built fresh for each call
///
/// Keys keep the spelling they were inserted with, which is what goes on
/// the wire. Inserting a key that differs only in case replaces the
/// earlier entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: BTreeMap<String, (String, String)>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; blank names are ignored and `false` is returned
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if name.trim().is_empty() {
            return false;
        }
        self.entries
            .insert(name.to_lowercase(), (name, value.into()));
        true
    }

    /// Insert only when the key is absent or blank
    pub fn insert_default(&mut self, name: &str, value: &str) {
        if self.get_non_blank(name).is_none() {
            self.insert(name, value);
        }
    }

    /// Raw lookup; an empty string value is returned as-is
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_lowercase())
            .map(|(_, value)| value.as_str())
    }

    /// Lookup that treats blank values as absent
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries
            .remove(&name.to_lowercase())
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (name, value) with the caller's key spelling
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Consume into wire-ready pairs
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.entries.into_values().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = QueryMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Fold filters into a query map
///
/// Filters with a blank field name are skipped. Values are taken verbatim;
/// formatting dates or decimals is the caller's job. When the same field
/// appears twice the later filter wins.
pub fn translate(filters: &[Filter]) -> QueryMap {
    let mut query = QueryMap::new();
    for filter in filters {
        query.insert(filter.field_name.as_str(), filter.value.as_str());
    }
    query
}

/// Check every required filter is present and non-blank
///
/// # Errors
///
/// Returns one `MissingFilter` naming all missing fields, in the order
/// they are declared.
pub fn enforce_required<S: AsRef<str>>(
    entity: &str,
    query: &QueryMap,
    required: &[S],
) -> Result<(), ConnectorError> {
    let missing: Vec<String> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| query.get_non_blank(name).is_none())
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConnectorError::MissingFilter {
            entity: entity.to_string(),
            missing,
        })
    }
}
