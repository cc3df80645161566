//! Error types for tree construction, pattern matching and visitor passes.

use thiserror::Error;

use crate::model::{NodeId, NodeKind};

/// A specialized Result type for tree model operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// A specialized Result type for pattern matching.
pub type FilterResult<T> = Result<T, FilterError>;

/// A specialized Result type for visitor passes.
pub type VisitResult<T> = Result<T, VisitError>;

/// Errors raised by the node arena.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not refer to a node in this tree.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// The requested parent cannot contain a node of this kind.
    #[error("a {child} cannot be placed under a {parent}")]
    InvalidParent {
        /// Kind of the would-be parent.
        parent: NodeKind,
        /// Kind of the node being added.
        child: NodeKind,
    },

    /// Only projects and tasks carry a completion date.
    #[error("{kind} nodes have no completion date")]
    CompletionNotSupported {
        /// Kind of the node that was targeted.
        kind: NodeKind,
    },

    /// The node is not listed among its parent's children.
    #[error("node {0} is detached from its parent")]
    Detached(NodeId),
}

/// Errors raised while evaluating a filter pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as supplied by the caller.
        pattern: String,
        /// The regex engine's description of the problem.
        message: String,
    },
}

impl FilterError {
    /// Creates an invalid pattern error from a regex compile failure.
    pub fn invalid_pattern(pattern: impl Into<String>, err: &regex::Error) -> Self {
        FilterError::InvalidPattern {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }
}

/// Errors that abort a visitor pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VisitError {
    /// A filter pattern could not be compiled.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The tree was inconsistent with the operation.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// A kind hook ran for a node whose selection state was never set up.
    ///
    /// This means the driver skipped `begin_any`; it is a protocol violation.
    #[error("no selection state for node {0}")]
    SelectionMissing(NodeId),
}
