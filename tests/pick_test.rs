//! The interactive pick loop driven by a scripted selector.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{json, Value};

use treeselect::application::TreeSelect;
use treeselect::cli::pick::{pick_entries, pick_loop, PickAction, PROMPT};
use treeselect::config::Settings;
use treeselect::domain::NodeId;
use treeselect::infrastructure::traits::{SelectionItem, Selector};

/// Picks the item at each scripted position of the offered list, then cancels.
struct MockSelector {
    script: RefCell<VecDeque<usize>>,
    seen: RefCell<Vec<Vec<String>>>,
}

impl MockSelector {
    fn new(script: &[usize]) -> Self {
        Self {
            script: RefCell::new(script.iter().copied().collect()),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Selector for MockSelector {
    fn select_one(
        &self,
        items: &[SelectionItem],
        prompt: &str,
    ) -> Result<Option<SelectionItem>, String> {
        assert_eq!(prompt, PROMPT);
        self.seen
            .borrow_mut()
            .push(items.iter().map(|i| i.display.clone()).collect());
        let Some(position) = self.script.borrow_mut().pop_front() else {
            return Ok(None);
        };
        items
            .get(position)
            .cloned()
            .map(Some)
            .ok_or_else(|| format!("only {} items offered", items.len()))
    }
}

struct FailingSelector;

impl Selector for FailingSelector {
    fn select_one(&self, _: &[SelectionItem], _: &str) -> Result<Option<SelectionItem>, String> {
        Err("terminal unavailable".to_string())
    }
}

fn engine_for(records: &[Value]) -> TreeSelect {
    TreeSelect::from_settings(records, &Settings::default(), ())
}

fn engine() -> TreeSelect {
    engine_for(&[
        json!({"title": "A", "data": [{"title": "A1"}, {"title": "A2"}]}),
        json!({"title": "B"}),
    ])
}

fn label(engine: &TreeSelect, id: NodeId) -> String {
    engine.node(id).expect("node").data.to_string()
}

#[test]
fn given_collapsed_forest_when_listing_entries_then_roots_only_with_expanders_for_parents() {
    let engine = engine();

    let entries: Vec<(PickAction, String)> = pick_entries(&engine)
        .into_iter()
        .map(|entry| (entry.action, label(&engine, entry.id)))
        .collect();

    assert_eq!(
        entries,
        vec![
            (PickAction::Check, "A".to_string()),
            (PickAction::Expand, "A".to_string()),
            (PickAction::Check, "B".to_string()),
        ]
    );
}

#[test]
fn given_script_when_picking_then_applied_until_cancel() {
    let mut engine = engine();
    // expand A, then check A1 and A2 (rows: A, A, A1, A2, B)
    let selector = MockSelector::new(&[1, 2, 3]);

    let applied = pick_loop(&mut engine, &selector).expect("pick loop");

    assert_eq!(applied, 3);
    let a = engine.find(&"A".parse().unwrap()).expect("A");
    assert!(engine.node(a).expect("node").selected);
    assert_eq!(engine.selection().len(), 3);
    // After expanding, the children are offered too
    let seen = selector.seen.borrow();
    assert_eq!(seen.len(), 4);
    assert!(seen[1].iter().any(|display| display.contains("A/A1")));
}

#[test]
fn given_duplicate_sibling_labels_when_picking_second_then_only_second_toggles() {
    let mut engine = engine_for(&[json!({
        "title": "A",
        "isExpanded": true,
        "data": [{"title": "x"}, {"title": "x"}, {"title": "y"}]
    })]);
    let a = engine.arena().roots()[0];
    let (first, second) = (engine.arena().children(a)[0], engine.arena().children(a)[1]);
    let entries = pick_entries(&engine);
    let displays: Vec<&str> = entries.iter().map(|e| e.item.display.as_str()).collect();
    assert_eq!(entries[3].id, second);
    assert!(displays[2] != displays[3]);

    pick_loop(&mut engine, &MockSelector::new(&[3])).expect("pick loop");

    assert!(engine.node(second).expect("node").selected);
    assert!(!engine.node(first).expect("node").selected);
    assert_eq!(engine.selection(), &[second]);
}

#[test]
fn given_label_with_separator_when_picking_then_node_toggles() {
    let mut engine = engine_for(&[json!({"title": "a/b"}), json!({"title": "c"})]);
    let root = engine.arena().roots()[0];

    let applied = pick_loop(&mut engine, &MockSelector::new(&[0])).expect("pick loop");

    assert_eq!(applied, 1);
    assert_eq!(engine.selection(), &[root]);
}

#[test]
fn given_immediate_cancel_when_picking_then_nothing_applied() {
    let mut engine = engine();
    let selector = MockSelector::new(&[]);

    let applied = pick_loop(&mut engine, &selector).expect("pick loop");

    assert_eq!(applied, 0);
    assert!(engine.selection().is_empty());
}

#[test]
fn given_selector_failure_when_picking_then_error() {
    let mut engine = engine();

    let result = pick_loop(&mut engine, &FailingSelector);

    assert!(result.is_err());
}
