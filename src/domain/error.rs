//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;
use crate::domain::path::NodePath;

/// Domain errors represent misuse of the tree API.
/// They are raised before any link is changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    InvalidOperation { message: String },

    #[error("no element found at path {path}")]
    OutOfRange { path: NodePath },

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}

impl DomainError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn out_of_range(path: &NodePath) -> Self {
        Self::OutOfRange { path: path.clone() }
    }
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
