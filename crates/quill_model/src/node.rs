//! Node identifiers and node payloads.

use std::fmt;

use serde::Serialize;

use crate::Attributes;

/// Index of a node inside a [`Document`](crate::Document) arena.
///
/// Ids are only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates an id from a raw arena index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A named container. `max_offset` is the number of offset slots its
    /// children occupy (one per element, one per character).
    Element {
        name: String,
        children: Vec<NodeId>,
        max_offset: usize,
    },
    /// One or more characters sharing the node's attributes.
    Text { data: String, char_len: usize },
}

impl NodeKind {
    /// Number of offset slots this node occupies in its parent.
    #[inline]
    pub fn offset_size(&self) -> usize {
        match self {
            NodeKind::Element { .. } => 1,
            NodeKind::Text { char_len, .. } => *char_len,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, NodeKind::Element { .. })
    }
}

/// An arena slot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeEntry {
    /// Non-owning link to the containing element. `None` for roots.
    pub(crate) parent: Option<NodeId>,
    /// First offset slot occupied in the parent.
    pub(crate) start_offset: usize,
    pub(crate) attributes: Attributes,
    pub(crate) kind: NodeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_roundtrip() {
        let id = NodeId::new(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.to_string(), "#42");
    }

    #[test]
    fn test_offset_size() {
        let element = NodeKind::Element {
            name: "p".to_string(),
            children: Vec::new(),
            max_offset: 0,
        };
        let text = NodeKind::Text {
            data: "héllo".to_string(),
            char_len: 5,
        };

        assert_eq!(element.offset_size(), 1);
        assert!(element.is_element());
        assert_eq!(text.offset_size(), 5);
        assert!(!text.is_element());
    }
}
