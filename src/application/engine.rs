//! Selection engine: checkbox propagation, expansion and reconciliation.

use std::fmt;

use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::event::PressEvent;
use crate::application::listener::SelectionListener;
use crate::application::options::SelectOptions;
use crate::config::Settings;
use crate::domain::{
    ForestBuilder, KeyAccessor, NodeId, NodePath, RecordAccessor, TreeArena, TreeNode, VisibleRow,
    EXPANDED_FIELD, SELECTED_FIELD,
};

/// Token that changes on every reconciliation.
///
/// Nodes are mutated in place, so views must key redraws on this value
/// rather than on node identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hierarchical multi-select state over one forest.
///
/// Owns the forest, the current selection snapshot and the listener. All
/// mutation happens through `&mut self`, one operation at a time.
pub struct TreeSelect<A: RecordAccessor = KeyAccessor, L: SelectionListener = ()> {
    arena: TreeArena,
    accessor: A,
    options: SelectOptions,
    listener: L,
    selection: Vec<NodeId>,
    generation: Generation,
}

impl<L: SelectionListener> TreeSelect<KeyAccessor, L> {
    /// Build an engine from loaded settings, reporting misconfiguration.
    ///
    /// A warning never stops the engine; it keeps operating with the keys
    /// as given.
    pub fn from_settings(records: &[Value], settings: &Settings, listener: L) -> Self {
        report_warnings(settings);
        Self::new(
            records,
            settings.accessor(),
            settings.select_options(),
            listener,
        )
    }

    /// Like [`TreeSelect::from_settings`], for a whole document (list or table).
    pub fn from_document(
        document: &Value,
        settings: &Settings,
        listener: L,
    ) -> ApplicationResult<Self> {
        report_warnings(settings);
        let accessor = settings.accessor();
        let arena = ForestBuilder::new(&accessor).build_document(document)?;
        Ok(Self::with_arena(
            arena,
            accessor,
            settings.select_options(),
            listener,
        ))
    }
}

fn report_warnings(settings: &Settings) {
    for warning in settings.validate() {
        warn!("{}", warning);
    }
}

impl<A: RecordAccessor, L: SelectionListener> TreeSelect<A, L> {
    pub fn new(records: &[Value], accessor: A, options: SelectOptions, listener: L) -> Self {
        let arena = ForestBuilder::new(&accessor).build(records);
        Self::with_arena(arena, accessor, options, listener)
    }

    /// Wrap an already built forest.
    pub fn with_arena(arena: TreeArena, accessor: A, options: SelectOptions, listener: L) -> Self {
        let mut engine = Self {
            arena,
            accessor,
            options,
            listener,
            selection: Vec::new(),
            generation: Generation::default(),
        };
        engine.rebuild_snapshot();
        engine
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get_node(id)
    }

    /// Current selection snapshot: selected nodes in pre-order.
    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Payload records of the selected nodes, in snapshot order.
    pub fn selected_records(&self) -> Vec<&Value> {
        self.selection
            .iter()
            .filter_map(|&id| self.arena.get_node(id))
            .map(|node| &node.data.record)
            .collect()
    }

    pub fn find(&self, path: &NodePath) -> Option<NodeId> {
        path.resolve(&self.arena)
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.arena.visible_rows()
    }

    /// Replace the whole forest with new records.
    #[instrument(level = "debug", skip_all, fields(roots = records.len()))]
    pub fn set_data(&mut self, records: &[Value]) -> Generation {
        self.arena = ForestBuilder::new(&self.accessor).build(records);
        self.reconcile()
    }

    /// Checkbox press: toggle the node's selection and notify the listener.
    #[instrument(level = "debug", skip(self))]
    pub fn on_press_checkbox(&mut self, id: NodeId) -> ApplicationResult<Generation> {
        let auto_expandable = self.options.auto_expandable;
        let node = self.node_mut(id)?;
        let value = !node.selected;
        if value && auto_expandable {
            node.expanded = true;
        }

        let generation = self.apply_selection(id, value)?;

        let selected: Vec<&TreeNode> = self
            .selection
            .iter()
            .filter_map(|&id| self.arena.get_node(id))
            .collect();
        self.listener.on_check_box_press(&selected);
        Ok(generation)
    }

    /// Set a node's selection and propagate it according to the options.
    ///
    /// Descendants are finalized before ancestors are re-derived, so every
    /// ancestor sees the final values of its children.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_selection(&mut self, id: NodeId, value: bool) -> ApplicationResult<Generation> {
        self.node_mut(id)?.selected = value;

        if self.options.auto_select_children {
            self.cascade(id, value);
        }
        if self.options.auto_select_parents {
            self.derive_ancestors(id);
        }

        Ok(self.reconcile())
    }

    /// Expander press: toggle the node's expansion and notify the listener.
    #[instrument(level = "debug", skip(self))]
    pub fn show_children(&mut self, id: NodeId) -> ApplicationResult<Generation> {
        let node = self.node_mut(id)?;
        node.expanded = !node.expanded;
        debug!("expanded {} -> {}", node.data, node.expanded);

        if let Some(node) = self.arena.get_node(id) {
            self.listener.on_parent_press(node);
        }
        Ok(self.reconcile())
    }

    /// Leaf row press: notification only, no state changes.
    #[instrument(level = "debug", skip(self))]
    pub fn press_child(&mut self, id: NodeId) -> ApplicationResult<()> {
        let node = self
            .arena
            .get_node(id)
            .ok_or(ApplicationError::UnknownNode(id))?;
        self.listener.on_child_press(node);
        Ok(())
    }

    /// Resolve a textual event against the forest and run it.
    pub fn dispatch(&mut self, event: &PressEvent) -> ApplicationResult<Generation> {
        let id = event.path().resolve_or_err(&self.arena)?;
        match event {
            PressEvent::Check(_) => self.on_press_checkbox(id),
            PressEvent::Expand(_) => self.show_children(id),
            PressEvent::Press(_) => {
                self.press_child(id)?;
                Ok(self.generation)
            }
        }
    }

    /// Rebuild the selection snapshot from scratch and advance the generation.
    pub fn reconcile(&mut self) -> Generation {
        self.rebuild_snapshot();
        self.generation = self.generation.next();
        debug!(
            "reconciled: {} selected, generation {}",
            self.selection.len(),
            self.generation
        );
        self.generation
    }

    /// Export the forest as records, with flags and children written back.
    pub fn to_records(&self) -> Vec<Value> {
        self.arena
            .roots()
            .iter()
            .map(|&root| self.export(root))
            .collect()
    }

    fn export(&self, id: NodeId) -> Value {
        let Some(node) = self.arena.get_node(id) else {
            return Value::Null;
        };
        let mut record = node.data.record.clone();
        if let Some(map) = record.as_object_mut() {
            map.insert(SELECTED_FIELD.to_string(), Value::Bool(node.selected));
            map.insert(EXPANDED_FIELD.to_string(), Value::Bool(node.expanded));
        }
        if !node.children.is_empty() {
            let children = node.children.iter().map(|&c| self.export(c)).collect();
            self.accessor.put_children(&mut record, children);
        }
        record
    }

    fn node_mut(&mut self, id: NodeId) -> ApplicationResult<&mut TreeNode> {
        self.arena
            .get_node_mut(id)
            .ok_or(ApplicationError::UnknownNode(id))
    }

    fn cascade(&mut self, id: NodeId, value: bool) {
        let descendants: Vec<NodeId> = self.arena.iter_subtree(id).skip(1).map(|(d, _)| d).collect();
        trace!("cascading {} to {} descendants", value, descendants.len());
        for descendant in descendants {
            if let Some(node) = self.arena.get_node_mut(descendant) {
                node.selected = value;
            }
        }
    }

    /// Re-derive every ancestor, nearest first, as the AND of its children.
    fn derive_ancestors(&mut self, id: NodeId) {
        let ancestors: Vec<NodeId> = self.arena.ancestors(id).collect();
        for ancestor in ancestors {
            let children = self.arena.children(ancestor);
            if children.is_empty() {
                continue;
            }
            let all_selected = children
                .iter()
                .all(|&child| self.arena.get_node(child).is_some_and(|n| n.selected));
            if let Some(node) = self.arena.get_node_mut(ancestor) {
                trace!("derived {} -> {}", node.data, all_selected);
                node.selected = all_selected;
            }
        }
    }

    fn rebuild_snapshot(&mut self) {
        self.selection = self
            .arena
            .iter()
            .filter(|(_, node)| node.selected)
            .map(|(id, _)| id)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine(options: SelectOptions) -> TreeSelect {
        let records = vec![json!({
            "title": "A",
            "data": [{"title": "A1"}, {"title": "A2"}]
        })];
        TreeSelect::new(&records, KeyAccessor::default(), options, ())
    }

    fn id(engine: &TreeSelect, path: &str) -> NodeId {
        let path: NodePath = path.parse().expect("valid path");
        engine.find(&path).expect("node exists")
    }

    #[test]
    fn given_replaced_forest_of_same_shape_when_pressing_old_id_then_unknown_node() {
        let mut engine = engine(SelectOptions::default());
        let stale = id(&engine, "A/A1");
        engine.set_data(&[json!({
            "title": "X",
            "data": [{"title": "X1"}, {"title": "X2"}, {"title": "X3"}]
        })]);

        assert!(matches!(
            engine.on_press_checkbox(stale),
            Err(ApplicationError::UnknownNode(_))
        ));
        assert!(matches!(
            engine.show_children(stale),
            Err(ApplicationError::UnknownNode(_))
        ));
        assert!(engine.node(stale).is_none());
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn given_mutations_when_reconciling_then_generation_increases() {
        let mut engine = engine(SelectOptions::default());
        let a = id(&engine, "A");
        assert_eq!(engine.generation().value(), 0);

        let g1 = engine.show_children(a).expect("expand");
        let g2 = engine.on_press_checkbox(a).expect("check");

        assert!(g2 > g1);
        assert_eq!(engine.generation(), g2);
    }

    #[test]
    fn given_auto_expandable_when_selecting_then_expands_but_not_on_unselect() {
        let options = SelectOptions {
            auto_expandable: true,
            ..SelectOptions::default()
        };
        let mut engine = engine(options);
        let a = id(&engine, "A");

        engine.on_press_checkbox(a).expect("select");
        assert!(engine.node(a).is_some_and(|n| n.expanded));

        engine.on_press_checkbox(a).expect("unselect");
        assert!(engine.node(a).is_some_and(|n| n.expanded && !n.selected));
    }

    #[test]
    fn given_children_disabled_when_unselecting_parent_then_children_untouched() {
        let options = SelectOptions {
            auto_select_children: false,
            ..SelectOptions::default()
        };
        let mut engine = engine(options);
        let a = id(&engine, "A");
        let a1 = id(&engine, "A/A1");
        let a2 = id(&engine, "A/A2");
        engine.on_press_checkbox(a1).expect("a1");
        engine.on_press_checkbox(a2).expect("a2");
        assert!(engine.node(a).is_some_and(|n| n.selected));

        engine.on_press_checkbox(a).expect("unselect a");

        assert!(engine.node(a).is_some_and(|n| !n.selected));
        assert_eq!(engine.selection(), &[a1, a2]);
    }

    #[test]
    fn given_selection_when_exporting_then_writes_flags_and_children() {
        let mut engine = engine(SelectOptions::default());
        let a1 = id(&engine, "A/A1");
        engine.on_press_checkbox(a1).expect("a1");

        let records = engine.to_records();

        assert_eq!(records[0]["isSelected"], json!(false));
        assert_eq!(records[0]["data"][0]["title"], json!("A1"));
        assert_eq!(records[0]["data"][0]["isSelected"], json!(true));
        assert_eq!(records[0]["data"][1]["isSelected"], json!(false));
    }
}
