//! Hierarchical multi-select state engine.
//!
//! A forest of labeled records is ingested into an arena; checkbox presses
//! propagate selection down to descendants and up to ancestors, expander
//! presses toggle expansion, and after every mutation the selected nodes are
//! collected into a pre-order snapshot tagged with a fresh generation.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod render;
pub mod util;

pub use application::{Generation, SelectOptions, SelectionListener, TreeSelect};
pub use domain::{KeyAccessor, NodeId, NodePath, RecordAccessor, TreeArena, TreeNode};
