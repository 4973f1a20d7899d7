//! Domain layer: forest model and record ingestion
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod accessor;
pub mod arena;
pub mod builder;
pub mod error;
pub mod path;

pub use accessor::{KeyAccessor, RecordAccessor, EXPANDED_FIELD, SELECTED_FIELD};
pub use arena::{NodeData, NodeId, RowKind, TreeArena, TreeNode, VisibleRow};
pub use builder::ForestBuilder;
pub use error::DomainError;
pub use path::NodePath;
