//! Forest builder: ingests caller records into an arena.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::accessor::{RecordAccessor, EXPANDED_FIELD, SELECTED_FIELD};
use crate::domain::arena::{NodeData, NodeId, TreeArena};
use crate::domain::error::DomainError;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs a forest from records, deep-copying the input.
///
/// Parent links are established for every node during the build, so every
/// node can propagate upward regardless of what has been displayed.
pub struct ForestBuilder<'a, A: RecordAccessor + ?Sized> {
    accessor: &'a A,
}

impl<'a, A: RecordAccessor + ?Sized> ForestBuilder<'a, A> {
    pub fn new(accessor: &'a A) -> Self {
        Self { accessor }
    }

    /// Build a forest from an ordered sequence of root records.
    #[instrument(level = "debug", skip_all, fields(roots = records.len()))]
    pub fn build(&self, records: &[Value]) -> TreeArena {
        let mut tree = TreeArena::new();
        let mut stack: Vec<(Value, Option<NodeId>)> =
            records.iter().rev().map(|r| (r.clone(), None)).collect();

        while let Some((mut record, parent_idx)) = stack.pop() {
            let label = self.accessor.label(&record).map(str::to_string);
            let children = self.accessor.take_children(&mut record);
            let (selected, expanded) = take_flags(&mut record);

            let current_idx = tree.insert_node(NodeData { label, record }, parent_idx);
            if let Some(node) = tree.get_node_mut(current_idx) {
                node.selected = selected;
                node.expanded = expanded;
            }

            // Reversed so children are inserted in input order
            for child in children.into_iter().rev() {
                stack.push((child, Some(current_idx)));
            }
        }

        debug!("built forest with {} nodes", tree.len());
        tree
    }

    /// Build a forest from a whole document.
    ///
    /// A sequence is the root list itself; a table holding the children field
    /// is unwrapped to that list (TOML documents cannot be top-level arrays).
    pub fn build_document(&self, document: &Value) -> TreeResult<TreeArena> {
        match document {
            Value::Array(records) => Ok(self.build(records)),
            Value::Object(_) => {
                let mut table = document.clone();
                let records = self.accessor.take_children(&mut table);
                if records.is_empty() {
                    warn!("document table holds no root records under the children field");
                }
                Ok(self.build(&records))
            }
            other => Err(DomainError::InvalidDocument(format!(
                "expected a list of records, found {}",
                kind_name(other)
            ))),
        }
    }
}

/// Remove seeded flags from the payload; anything but `true` reads as false.
fn take_flags(record: &mut Value) -> (bool, bool) {
    let Some(map) = record.as_object_mut() else {
        return (false, false);
    };
    let selected = map.remove(SELECTED_FIELD).and_then(|v| v.as_bool());
    let expanded = map.remove(EXPANDED_FIELD).and_then(|v| v.as_bool());
    (selected.unwrap_or(false), expanded.unwrap_or(false))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}
