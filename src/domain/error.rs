//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent input the forest cannot be built from.
///
/// Malformed individual records are never an error: they degrade to nodes
/// without label or children.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid tree document: {0}")]
    InvalidDocument(String),

    #[error("no node at path: {0}")]
    PathNotFound(String),

    #[error("invalid event '{event}': {reason}")]
    InvalidEvent { event: String, reason: String },
}
