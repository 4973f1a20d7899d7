//! Interactive pick loop over the visible rows of a forest.

use std::fmt;

use tracing::{debug, instrument};

use crate::application::{SelectionListener, TreeSelect};
use crate::domain::{NodeId, NodePath, RecordAccessor, RowKind};
use crate::infrastructure::traits::{SelectionItem, Selector};
use crate::infrastructure::InfraError;
use crate::render::row_text;

use super::error::CliResult;

pub const PROMPT: &str = "toggle> ";

/// What picking an entry does to its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickAction {
    Check,
    Expand,
}

impl fmt::Display for PickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickAction::Check => write!(f, "check "),
            PickAction::Expand => write!(f, "expand"),
        }
    }
}

/// A picker line bound to the node it acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickEntry {
    pub id: NodeId,
    pub action: PickAction,
    pub item: SelectionItem,
}

/// Picker entries for the rows currently visible.
///
/// Every row offers `check`; parent rows also offer `expand`. Entries are
/// numbered, and the number is both the item value and the display prefix,
/// so rows with equal labels stay distinct. The label path is display only.
pub fn pick_entries<A: RecordAccessor, L: SelectionListener>(
    engine: &TreeSelect<A, L>,
) -> Vec<PickEntry> {
    let arena = engine.arena();
    let mut entries = Vec::new();

    for row in engine.visible_rows() {
        let Some(node) = arena.get_node(row.id) else {
            continue;
        };
        let line = format!("{}{}", "  ".repeat(row.level), row_text(node));
        let location = match NodePath::of(arena, row.id) {
            Some(path) => path.to_string(),
            None => row.id.to_string(),
        };

        let actions: &[PickAction] = match row.kind {
            RowKind::Parent => &[PickAction::Check, PickAction::Expand],
            RowKind::Leaf => &[PickAction::Check],
        };
        for &action in actions {
            let number = entries.len();
            entries.push(PickEntry {
                id: row.id,
                action,
                item: SelectionItem {
                    display: format!("{:>3} {} {}  · {}", number, action, line, location),
                    value: number.to_string(),
                },
            });
        }
    }
    entries
}

/// Present rows until the user aborts; each pick is applied to its node.
///
/// Returns the number of picks applied.
#[instrument(level = "debug", skip_all)]
pub fn pick_loop<A, L, S>(engine: &mut TreeSelect<A, L>, selector: &S) -> CliResult<usize>
where
    A: RecordAccessor,
    L: SelectionListener,
    S: Selector + ?Sized,
{
    let mut applied = 0;
    loop {
        let entries = pick_entries(engine);
        let items: Vec<SelectionItem> = entries.iter().map(|entry| entry.item.clone()).collect();
        let picked = selector
            .select_one(&items, PROMPT)
            .map_err(|message| InfraError::Selector { message })?;
        let Some(item) = picked else {
            break;
        };

        let entry = entries
            .iter()
            .find(|entry| entry.item.value == item.value)
            .ok_or_else(|| InfraError::Selector {
                message: format!("picked entry not offered: {}", item.value),
            })?;
        debug!("picked {} on {}", entry.action, entry.id);
        match entry.action {
            PickAction::Check => engine.on_press_checkbox(entry.id)?,
            PickAction::Expand => engine.show_children(entry.id)?,
        };
        applied += 1;
    }
    Ok(applied)
}
