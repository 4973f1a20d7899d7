use generational_arena::{Arena, Index};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::instrument;

static NEXT_FOREST: AtomicU64 = AtomicU64::new(1);

/// Stable handle to a node, valid for the lifetime of its forest.
///
/// Ids carry the forest they were issued by; any other forest rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    forest: u64,
    index: Index,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (idx, generation) = self.index.into_raw_parts();
        write!(f, "#{}:{}.{}", self.forest, idx, generation)
    }
}

/// Data payload carried by every node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// String label, None when the record has no renderable label
    pub label: Option<String>,
    /// Deep copy of the input record without its children and flags
    pub record: Value,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "<unlabeled>"),
        }
    }
}

/// How a display row for a node is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Labeled node with children: checkbox, label and expander
    Parent,
    /// Labeled node without children: checkbox and label
    Leaf,
}

/// Tree node in the arena-based forest.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    pub selected: bool,
    pub expanded: bool,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in input order
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn label(&self) -> Option<&str> {
        self.data.label.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Row kind for display, None for nodes without a label.
    pub fn row_kind(&self) -> Option<RowKind> {
        self.data.label.as_ref()?;
        if self.is_leaf() {
            Some(RowKind::Leaf)
        } else {
            Some(RowKind::Parent)
        }
    }
}

/// A node as it appears in the displayed, expansion-filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    pub level: usize,
    pub kind: RowKind,
}

/// Arena-based forest: an ordered list of roots and their descendants.
///
/// Parent links are plain indices, so the parent/child relation carries no
/// ownership cycle. Nodes are never removed.
#[derive(Debug)]
pub struct TreeArena {
    forest: u64,
    arena: Arena<TreeNode>,
    roots: Vec<NodeId>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self {
            forest: NEXT_FOREST.fetch_add(1, Ordering::Relaxed),
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self, data), fields(label = ?data.label))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let node = TreeNode {
            data,
            selected: false,
            expanded: false,
            parent: None,
            children: Vec::new(),
        };
        let node_id = NodeId {
            forest: self.forest,
            index: self.arena.insert(node),
        };

        match parent {
            Some(parent_id) => {
                if let Some(parent) = self.get_node_mut(parent_id) {
                    parent.children.push(node_id);
                }
                self.attach_parent(node_id, parent_id);
            }
            None => self.roots.push(node_id),
        }

        node_id
    }

    /// Set the parent back-reference of `child` unless one is already set.
    ///
    /// Returns true when the link was established by this call.
    pub fn attach_parent(&mut self, child: NodeId, parent: NodeId) -> bool {
        match self.get_node_mut(child) {
            Some(node) if node.parent.is_none() => {
                node.parent = Some(parent);
                true
            }
            _ => false,
        }
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        if id.forest != self.forest {
            return None;
        }
        self.arena.get(id.index)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        if id.forest != self.forest {
            return None;
        }
        self.arena.get_mut(id.index)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Ancestors of `id`, nearest first, ending at its root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: self.parent(id),
        }
    }

    /// Pre-order traversal over every root and all of its descendants.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, &self.roots)
    }

    /// Pre-order traversal of the subtree rooted at `id`, `id` included.
    pub fn iter_subtree(&self, id: NodeId) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, &[id])
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, id: NodeId) -> usize {
        1 + self
            .children(id)
            .iter()
            .map(|&child| self.calculate_depth(child))
            .max()
            .unwrap_or(0)
    }

    /// Rows a list view would draw: descends only into expanded nodes.
    ///
    /// Unlabeled nodes produce no row but their expanded children still do.
    #[instrument(level = "debug", skip(self))]
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<(NodeId, usize)> =
            self.roots.iter().rev().map(|&root| (root, 0)).collect();

        while let Some((id, level)) = stack.pop() {
            let Some(node) = self.get_node(id) else {
                continue;
            };
            if let Some(kind) = node.row_kind() {
                rows.push(VisibleRow { id, level, kind });
            }
            if node.expanded {
                for &child in node.children.iter().rev() {
                    stack.push((child, level + 1));
                }
            }
        }
        rows
    }
}

pub struct Ancestors<'a> {
    arena: &'a TreeArena,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.parent(current);
        Some(current)
    }
}

pub struct PreOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a TreeArena, start: &[NodeId]) -> Self {
        // Reversed so the first start node is popped first
        let stack = start.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}
