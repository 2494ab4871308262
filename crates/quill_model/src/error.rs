//! Model error types.

use thiserror::Error;

use crate::NodeId;

/// Errors raised while building or querying a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The id does not belong to the document's arena.
    #[error("model-unknown-node: node {0} does not exist in this document")]
    UnknownNode(NodeId),

    /// A text run was used where an element is required.
    #[error("model-not-an-element: node {0} is a text run, not an element")]
    NotAnElement(NodeId),

    /// Text runs must hold at least one character.
    #[error("model-empty-text: text runs cannot be empty")]
    EmptyText,

    /// A root with this name was already created.
    #[error("model-duplicate-root: a root named `{0}` already exists")]
    DuplicateRoot(String),

    /// The serialized document description could not be read.
    #[error("model-invalid-description: {0}")]
    InvalidDescription(String),
}

impl ModelError {
    /// Creates an invalid description error.
    pub fn invalid_description(message: impl Into<String>) -> Self {
        Self::InvalidDescription(message.into())
    }

    /// Stable code identifying the error kind.
    ///
    /// Callers should match on this rather than on the display text.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::UnknownNode(_) => "model-unknown-node",
            ModelError::NotAnElement(_) => "model-not-an-element",
            ModelError::EmptyText => "model-empty-text",
            ModelError::DuplicateRoot(_) => "model-duplicate-root",
            ModelError::InvalidDescription(_) => "model-invalid-description",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_starts_with_code() {
        let errors = [
            ModelError::UnknownNode(NodeId::new(7)),
            ModelError::NotAnElement(NodeId::new(1)),
            ModelError::EmptyText,
            ModelError::DuplicateRoot("main".to_string()),
            ModelError::invalid_description("missing field `name`"),
        ];

        for error in errors {
            assert!(
                error.to_string().starts_with(error.code()),
                "`{}` should start with `{}`",
                error,
                error.code()
            );
        }
    }

    #[test]
    fn test_duplicate_root_message() {
        let error = ModelError::DuplicateRoot("main".to_string());
        assert!(error.to_string().contains("`main`"));
    }
}
