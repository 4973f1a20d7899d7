//! Infrastructure layer: document loading and interactive selection
//!
//! This layer implements the I/O boundary around the engine.

pub mod error;
pub mod loader;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use loader::{load_document, DocumentFormat};
