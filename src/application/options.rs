//! Behavior flags of the selection engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SelectOptions {
    /// Re-derive ancestors as the AND of their immediate children
    pub auto_select_parents: bool,
    /// Apply a selection value to every descendant
    pub auto_select_children: bool,
    /// Expand a node when its checkbox selects it
    pub auto_expandable: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            auto_select_parents: true,
            auto_select_children: true,
            auto_expandable: false,
        }
    }
}
