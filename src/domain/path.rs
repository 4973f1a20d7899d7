//! Label paths addressing nodes from the roots, e.g. `Fruits/Apple`.

use std::fmt;
use std::str::FromStr;

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::DomainError;

pub const SEPARATOR: char = '/';

/// Slash-separated sequence of labels from a root down to a node.
///
/// Among siblings sharing a label the first one wins. Labels that contain
/// the separator cannot be addressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// Path of an existing node, None if it or an ancestor has no label.
    pub fn of(arena: &TreeArena, id: NodeId) -> Option<Self> {
        let mut segments = Vec::new();
        for current in std::iter::once(id).chain(arena.ancestors(id)) {
            segments.push(arena.get_node(current)?.label()?.to_string());
        }
        segments.reverse();
        Some(Self(segments))
    }

    pub fn resolve(&self, arena: &TreeArena) -> Option<NodeId> {
        let mut candidates = arena.roots();
        let mut found = None;
        for segment in &self.0 {
            let id = candidates.iter().copied().find(|&id| {
                arena
                    .get_node(id)
                    .and_then(|node| node.label())
                    .is_some_and(|label| label == segment)
            })?;
            found = Some(id);
            candidates = arena.children(id);
        }
        found
    }

    pub fn resolve_or_err(&self, arena: &TreeArena) -> Result<NodeId, DomainError> {
        self.resolve(arena)
            .ok_or_else(|| DomainError::PathNotFound(self.to_string()))
    }
}

impl FromStr for NodePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = s
            .trim_matches(SEPARATOR)
            .split(SEPARATOR)
            .map(str::to_string)
            .collect();
        if segments.iter().any(String::is_empty) {
            return Err(DomainError::PathNotFound(s.to_string()));
        }
        Ok(Self(segments))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
