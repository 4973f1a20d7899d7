/*
Text rendering of the forest for the command line.

The engine itself draws nothing; this is the thin view the CLI puts on top of
the node flags: checkbox, chevron and label per node.
 */
use termtree::Tree;

use crate::domain::{NodeId, RowKind, TreeArena, TreeNode};

pub const CHECKED: &str = "[x]";
pub const UNCHECKED: &str = "[ ]";
pub const OPEN: &str = "▾";
pub const CLOSED: &str = "▸";

/// One-line rendering of a node: checkbox, label and chevron for parents.
pub fn row_text(node: &TreeNode) -> String {
    let checkbox = if node.selected { CHECKED } else { UNCHECKED };
    match node.row_kind() {
        Some(RowKind::Parent) => {
            let chevron = if node.expanded { OPEN } else { CLOSED };
            format!("{} {} {}", checkbox, node.data, chevron)
        }
        Some(RowKind::Leaf) | None => format!("{} {}", checkbox, node.data),
    }
}

pub trait TreeNodeConvert {
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl TreeNodeConvert for TreeArena {
    /// Full forest regardless of expansion, one tree per root.
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        fn build_tree(arena: &TreeArena, node_idx: NodeId) -> Option<Tree<String>> {
            let node = arena.get_node(node_idx)?;
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child| build_tree(arena, child))
                .collect();
            Some(Tree::new(row_text(node)).with_leaves(leaves))
        }

        self.roots()
            .iter()
            .filter_map(|&root| build_tree(self, root))
            .collect()
    }
}
