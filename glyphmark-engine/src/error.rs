//! Layered error types
//!
//! The annotation core never fails. Only the in-place renderer touches
//! an external document, and its failures are per node.

use thiserror::Error;

/// Failure of a single document operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The node id does not refer to a live node
    #[error("node no longer exists")]
    NodeMissing,

    /// The node has no parent, so it cannot be replaced in place
    #[error("node is not attached to a parent")]
    Detached,

    /// A text operation was attempted on a non-text node
    #[error("node is not a text node")]
    NotText,

    /// An element operation was attempted on a non-element node
    #[error("node is not an element")]
    NotElement,

    /// The operation would make a node its own ancestor
    #[error("operation would create a cycle in the document tree")]
    InvalidHierarchy,
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Document operation failed
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
