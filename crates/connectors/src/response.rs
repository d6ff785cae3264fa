//! Response unwrapping
//!
//! Vendors wrap their payloads inconsistently (`{"invoices": [...]}`,
//! `{"entries": [...]}`, `{"response": {"folder_content": {...}}}`, or a bare
//! object). The unwrapper walks to the configured root and turns whatever it
//! finds into a list of schema-less [`Record`]s.

use serde::Serialize;
use serde_json::{Map, Value};
use std::ops::Deref;

/// Key used when an array element is not itself an object
pub const SCALAR_KEY: &str = "value";

/// One unwrapped entity instance
///
/// Field values are plain `serde_json::Value`s; nested objects and arrays
/// are kept as-is. Integers stay integers (`u64`/`i64`) so identifiers above
/// 2^53 survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field value as a string slice, if it is a JSON string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for Record {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

/// Walk a dotted path (`response.folder_info`) through nested objects
///
/// An empty path returns the document itself. Any missing segment, or a
/// segment that lands on a non-object, yields `None`.
pub fn navigate<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() {
        return Some(document);
    }
    path.split('.')
        .try_fold(document, |node, segment| node.as_object()?.get(segment))
}

/// Owned variant of [`navigate`], avoids cloning the subtree
fn take_path(mut document: Value, path: &str) -> Option<Value> {
    let path = path.trim();
    if path.is_empty() {
        return Some(document);
    }
    for segment in path.split('.') {
        document = match document {
            Value::Object(mut map) => map.remove(segment)?,
            _ => return None,
        };
    }
    Some(document)
}

/// Parse a raw payload and unwrap it
///
/// # Errors
///
/// Returns the parse error if `raw` is not valid JSON.
pub fn unwrap_records(raw: &str, root_path: &str) -> Result<Vec<Record>, serde_json::Error> {
    let document: Value = serde_json::from_str(raw)?;
    Ok(unwrap_value(document, root_path))
}

/// Unwrap an already parsed document
///
/// - missing root -> empty
/// - array -> one record per element
/// - object -> a single record
/// - anything else -> empty
pub fn unwrap_value(document: Value, root_path: &str) -> Vec<Record> {
    match take_path(document, root_path) {
        Some(Value::Array(items)) => items.into_iter().map(element_to_record).collect(),
        Some(Value::Object(map)) => vec![Record(map)],
        _ => Vec::new(),
    }
}

fn element_to_record(element: Value) -> Record {
    match element {
        Value::Object(map) => Record(map),
        other => {
            let mut map = Map::new();
            map.insert(SCALAR_KEY.to_string(), other);
            Record(map)
        }
    }
}
