//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the menu tree invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("invalid move: {active} cannot be placed under its own descendant {target}")]
    InvalidMove { active: String, target: String },

    #[error("depth exceeded: moving {id} would reach level {depth}, max level is {max}")]
    DepthExceeded { id: String, depth: usize, max: usize },

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("node cannot have children: {0}")]
    NotAContainer(String),

    #[error("invalid node {id}: {message}")]
    InvalidNode { id: String, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
