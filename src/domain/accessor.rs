//! Field access into externally shaped records.
//!
//! Records arrive as `serde_json::Value` objects whose label and children
//! live under caller-chosen field names. The engine never looks fields up by
//! name itself; it goes through a [`RecordAccessor`].

use serde_json::Value;

/// Field carrying a pre-seeded selection flag on input and export.
pub const SELECTED_FIELD: &str = "isSelected";
/// Field carrying a pre-seeded expansion flag on input and export.
pub const EXPANDED_FIELD: &str = "isExpanded";

pub const DEFAULT_TITLE_KEY: &str = "title";
pub const DEFAULT_CHILD_KEY: &str = "data";

/// Reads labels and children out of records.
pub trait RecordAccessor {
    /// String label of the record, `None` when missing or not a string.
    fn label<'a>(&self, record: &'a Value) -> Option<&'a str>;

    /// Detach the children sequence from an owned record.
    ///
    /// Absent, empty or non-sequence values yield no children; a non-sequence
    /// value is left in place untouched.
    fn take_children(&self, record: &mut Value) -> Vec<Value>;

    /// Put a children sequence back under the children field.
    fn put_children(&self, record: &mut Value, children: Vec<Value>);
}

/// Accessor reading fixed field names, e.g. `title` / `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAccessor {
    title_key: String,
    child_key: String,
}

impl Default for KeyAccessor {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_KEY, DEFAULT_CHILD_KEY)
    }
}

impl KeyAccessor {
    pub fn new(title_key: impl Into<String>, child_key: impl Into<String>) -> Self {
        Self {
            title_key: title_key.into(),
            child_key: child_key.into(),
        }
    }

    pub fn title_key(&self) -> &str {
        &self.title_key
    }

    pub fn child_key(&self) -> &str {
        &self.child_key
    }
}

impl RecordAccessor for KeyAccessor {
    fn label<'a>(&self, record: &'a Value) -> Option<&'a str> {
        record.get(&self.title_key).and_then(Value::as_str)
    }

    fn take_children(&self, record: &mut Value) -> Vec<Value> {
        let Some(map) = record.as_object_mut() else {
            return Vec::new();
        };
        if !matches!(map.get(&self.child_key), Some(Value::Array(_))) {
            return Vec::new();
        }
        match map.remove(&self.child_key) {
            Some(Value::Array(children)) => children,
            _ => Vec::new(),
        }
    }

    fn put_children(&self, record: &mut Value, children: Vec<Value>) {
        if let Some(map) = record.as_object_mut() {
            map.insert(self.child_key.clone(), Value::Array(children));
        }
    }
}
