use std::fmt;

use serde_json::Value;

/// Dotted property path such as `name.official`, resolved against JSON
/// records one key at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(|s| s.to_string()).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walks the record key by key. A missing key, or an intermediate value
    /// that is not an object, yields `None`.
    pub fn lookup<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(record, |current, key| current.as_object()?.get(key))
    }

    /// Looks up the value and renders it as an option label.
    pub fn label(&self, record: &Value) -> Option<String> {
        self.lookup(record).and_then(label_of)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

pub fn label_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        // numbers, booleans and nested values use their JSON text
        _ => Some(value.to_string()),
    }
}
