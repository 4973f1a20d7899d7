//! Observer seam for engine notifications.

use crate::domain::TreeNode;

/// Receives engine notifications synchronously on the triggering call stack.
///
/// Every method defaults to a no-op, so implementors only override what they
/// consume. `()` is the listener that ignores everything.
pub trait SelectionListener {
    /// Called once per expander press, after the expanded flag flipped.
    fn on_parent_press(&mut self, _node: &TreeNode) {}

    /// Called when a leaf row is pressed.
    fn on_child_press(&mut self, _node: &TreeNode) {}

    /// Called once per checkbox press with the full rebuilt selection.
    fn on_check_box_press(&mut self, _selection: &[&TreeNode]) {}
}

impl SelectionListener for () {}
