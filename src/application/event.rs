//! Textual press events: `check:<path>`, `expand:<path>`, `press:<path>`.

use std::fmt;
use std::str::FromStr;

use crate::domain::{DomainError, NodePath};

/// A user interaction addressed by label path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressEvent {
    /// Checkbox press: toggles selection
    Check(NodePath),
    /// Expander press: toggles expansion
    Expand(NodePath),
    /// Row press on a leaf: notification only
    Press(NodePath),
}

impl PressEvent {
    pub fn path(&self) -> &NodePath {
        match self {
            PressEvent::Check(path) | PressEvent::Expand(path) | PressEvent::Press(path) => path,
        }
    }
}

impl FromStr for PressEvent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidEvent {
            event: s.to_string(),
            reason: reason.to_string(),
        };
        let (kind, path) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected <kind>:<path>"))?;
        let path: NodePath = path.trim().parse().map_err(|_| invalid("empty path segment"))?;

        match kind.trim() {
            "check" => Ok(PressEvent::Check(path)),
            "expand" => Ok(PressEvent::Expand(path)),
            "press" => Ok(PressEvent::Press(path)),
            _ => Err(invalid("kind must be check, expand or press")),
        }
    }
}

impl fmt::Display for PressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressEvent::Check(path) => write!(f, "check:{}", path),
            PressEvent::Expand(path) => write!(f, "expand:{}", path),
            PressEvent::Press(path) => write!(f, "press:{}", path),
        }
    }
}
