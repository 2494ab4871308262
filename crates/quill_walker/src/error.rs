//! Walker error types.

use quill_model::{ModelError, NodeId};
use thiserror::Error;

use crate::Position;

/// Errors raised by positions, ranges and the tree walker.
///
/// Every variant carries a stable [`code`](WalkerError::code); the display
/// text starts with it and is followed by a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkerError {
    /// Neither boundaries nor a starting position were supplied.
    #[error(
        "tree-walker-no-start-position: neither boundaries nor a starting position have been defined"
    )]
    NoStartPosition,

    /// A position does not resolve against the document.
    #[error("tree-walker-invalid-position: {reason} (root {root}, path {path:?})")]
    InvalidPosition {
        root: NodeId,
        path: Vec<usize>,
        reason: &'static str,
    },

    /// Boundaries and starting position belong to different roots.
    #[error("tree-walker-root-mismatch: boundaries and starting position must share one root")]
    RootMismatch,

    /// The explicit starting position is not inside the boundaries.
    #[error("tree-walker-position-out-of-boundaries: position {path:?} lies outside the boundaries")]
    PositionOutOfBoundaries { path: Vec<usize> },

    /// Positions need at least one offset.
    #[error("position-path-incorrect: a position path cannot be empty")]
    EmptyPath,

    /// Roots have no parent to be positioned in.
    #[error("position-before-root: cannot create a position before root {0}")]
    BeforeRoot(NodeId),

    /// Roots have no parent to be positioned in.
    #[error("position-after-root: cannot create a position after root {0}")]
    AfterRoot(NodeId),

    /// Model lookup failure.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl WalkerError {
    /// Creates an invalid position error for `position`.
    pub fn invalid_position(position: &Position, reason: &'static str) -> Self {
        Self::InvalidPosition {
            root: position.root(),
            path: position.path().to_vec(),
            reason,
        }
    }

    /// Stable code identifying the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            WalkerError::NoStartPosition => "tree-walker-no-start-position",
            WalkerError::InvalidPosition { .. } => "tree-walker-invalid-position",
            WalkerError::RootMismatch => "tree-walker-root-mismatch",
            WalkerError::PositionOutOfBoundaries { .. } => {
                "tree-walker-position-out-of-boundaries"
            }
            WalkerError::EmptyPath => "position-path-incorrect",
            WalkerError::BeforeRoot(_) => "position-before-root",
            WalkerError::AfterRoot(_) => "position-after-root",
            WalkerError::Model(e) => e.code(),
        }
    }
}
