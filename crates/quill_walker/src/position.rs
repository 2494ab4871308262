//! Path-addressed positions.
//!
//! A [`Position`] is a root plus a list of offsets. Every offset but the last
//! selects an element child; the last one is the slot inside that element,
//! which may point between two characters of a text run or one past the last
//! child.
//!
//! ```text
//!  root
//!   |- p            [0] before p, [1] after p
//!      |- "foo"     [0, 0] before "f", [0, 2] between "o" and "o"
//!      |- img       [0, 3] before img, [0, 3, 0] inside img
//! ```
//!
//! Positions are plain values. They are never updated in place, so a copy
//! captured from a walker event stays valid however far the walker moves.

use std::cmp::Ordering;
use std::fmt;

use quill_model::{Document, NodeId, NodeKind};
use serde::Serialize;

use crate::WalkerError;

/// Result of comparing two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionRelation {
    Before,
    Same,
    After,
    /// The positions belong to different roots.
    Different,
}

/// An immutable point in a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    root: NodeId,
    path: Vec<usize>,
}

impl Position {
    /// Creates a position from a root and an offset path.
    ///
    /// Offsets are not checked against the document; a walker reports paths
    /// that do not resolve when it first moves from them.
    pub fn new(root: NodeId, path: Vec<usize>) -> Result<Self, WalkerError> {
        if path.is_empty() {
            return Err(WalkerError::EmptyPath);
        }
        Ok(Self { root, path })
    }

    /// Callers guarantee `path` is not empty.
    pub(crate) fn from_parts(root: NodeId, path: Vec<usize>) -> Self {
        debug_assert!(!path.is_empty());
        Self { root, path }
    }

    /// Position at `offset` inside the element `parent`.
    pub fn from_parent_and_offset(
        doc: &Document,
        parent: NodeId,
        offset: usize,
    ) -> Result<Self, WalkerError> {
        if let NodeKind::Text { .. } = doc.kind(parent)? {
            return Err(quill_model::ModelError::NotAnElement(parent).into());
        }
        let mut path = doc.path_to(parent)?;
        path.push(offset);
        Ok(Self::from_parts(doc.root_of(parent)?, path))
    }

    /// Position directly before `node` in its parent.
    pub fn before(doc: &Document, node: NodeId) -> Result<Self, WalkerError> {
        let path = doc.path_to(node)?;
        if path.is_empty() {
            return Err(WalkerError::BeforeRoot(node));
        }
        Ok(Self::from_parts(doc.root_of(node)?, path))
    }

    /// Position directly after `node` in its parent.
    ///
    /// For a text run this is after its last character.
    pub fn after(doc: &Document, node: NodeId) -> Result<Self, WalkerError> {
        let mut path = doc.path_to(node)?;
        let size = doc.offset_size(node)?;
        match path.last_mut() {
            Some(last) => *last += size,
            None => return Err(WalkerError::AfterRoot(node)),
        }
        Ok(Self::from_parts(doc.root_of(node)?, path))
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Offset inside the parent element.
    #[inline]
    pub fn offset(&self) -> usize {
        self.path.last().copied().unwrap_or_default()
    }

    /// Path of the parent element (empty when the parent is the root).
    #[inline]
    pub fn parent_path(&self) -> &[usize] {
        &self.path[..self.path.len() - 1]
    }

    /// Number of offsets in the path.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The same parent, a different offset.
    pub fn with_offset(&self, offset: usize) -> Self {
        let mut path = self.path.clone();
        if let Some(last) = path.last_mut() {
            *last = offset;
        }
        Self::from_parts(self.root, path)
    }

    /// Moves the offset by `delta`, stopping at zero.
    pub fn shifted_by(&self, delta: isize) -> Self {
        self.with_offset(self.offset().saturating_add_signed(delta))
    }

    /// Compares document order.
    pub fn compare(&self, other: &Position) -> PositionRelation {
        if self.root != other.root {
            return PositionRelation::Different;
        }
        match self.path.cmp(&other.path) {
            Ordering::Less => PositionRelation::Before,
            Ordering::Equal => PositionRelation::Same,
            Ordering::Greater => PositionRelation::After,
        }
    }

    #[inline]
    pub fn is_before(&self, other: &Position) -> bool {
        self.compare(other) == PositionRelation::Before
    }

    #[inline]
    pub fn is_after(&self, other: &Position) -> bool {
        self.compare(other) == PositionRelation::After
    }

    /// Longest shared path prefix. Empty for different roots.
    pub fn common_path(&self, other: &Position) -> &[usize] {
        if self.root != other.root {
            return &[];
        }
        let len = self
            .path
            .iter()
            .zip(&other.path)
            .take_while(|(a, b)| a == b)
            .count();
        &self.path[..len]
    }

    /// Resolves the element the position lies in.
    pub fn parent(&self, doc: &Document) -> Result<NodeId, WalkerError> {
        if !doc.is_root(self.root) {
            return Err(WalkerError::invalid_position(self, "root is not a root element"));
        }

        let mut parent = self.root;
        for &offset in self.parent_path() {
            match doc.child_at_offset(parent, offset)? {
                Some((child, 0)) if doc.is_element(child) => parent = child,
                _ => {
                    return Err(WalkerError::invalid_position(
                        self,
                        "path does not descend through elements",
                    ));
                }
            }
        }
        Ok(parent)
    }

    /// Node occupying the slot after the position.
    ///
    /// Inside a text run this is the run itself.
    pub fn node_after(&self, doc: &Document) -> Result<Option<NodeId>, WalkerError> {
        let parent = self.parent(doc)?;
        Ok(doc.child_at_offset(parent, self.offset())?.map(|(node, _)| node))
    }

    /// Node occupying the slot before the position.
    pub fn node_before(&self, doc: &Document) -> Result<Option<NodeId>, WalkerError> {
        let parent = self.parent(doc)?;
        match self.offset().checked_sub(1) {
            Some(offset) => Ok(doc.child_at_offset(parent, offset)?.map(|(node, _)| node)),
            None => Ok(None),
        }
    }

    #[inline]
    pub fn is_at_start(&self) -> bool {
        self.offset() == 0
    }

    pub fn is_at_end(&self, doc: &Document) -> Result<bool, WalkerError> {
        let parent = self.parent(doc)?;
        Ok(self.offset() == doc.max_offset(parent)?)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.compare(other) {
            PositionRelation::Before => Some(Ordering::Less),
            PositionRelation::Same => Some(Ordering::Equal),
            PositionRelation::After => Some(Ordering::Greater),
            PositionRelation::Different => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, offset) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", offset)?;
        }
        f.write_str("]")
    }
}
