//! Application layer: the selection engine and its seams
//!
//! This layer drives the domain forest; it performs no I/O.

pub mod engine;
pub mod error;
pub mod event;
pub mod listener;
pub mod options;

pub use engine::{Generation, TreeSelect};
pub use error::{ApplicationError, ApplicationResult};
pub use event::PressEvent;
pub use listener::SelectionListener;
pub use options::SelectOptions;
