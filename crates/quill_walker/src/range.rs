//! Spans between two positions.

use std::fmt;

use quill_model::{Document, NodeId};
use serde::Serialize;

use crate::{Position, TreeWalker, TreeWalkerOptions, WalkerError};

/// A span from `start` (inclusive) to `end` (exclusive).
///
/// Callers are responsible for passing `start <= end`; the range does not
/// reorder its ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering the whole content of an element.
    pub fn in_element(doc: &Document, element: NodeId) -> Result<Self, WalkerError> {
        Ok(Self::new(
            Position::from_parent_and_offset(doc, element, 0)?,
            Position::from_parent_and_offset(doc, element, doc.max_offset(element)?)?,
        ))
    }

    /// Range from directly before to directly after a node.
    pub fn on_node(doc: &Document, node: NodeId) -> Result<Self, WalkerError> {
        Ok(Self::new(
            Position::before(doc, node)?,
            Position::after(doc, node)?,
        ))
    }

    #[inline]
    pub fn start(&self) -> &Position {
        &self.start
    }

    #[inline]
    pub fn end(&self) -> &Position {
        &self.end
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.start.root()
    }

    /// Returns true if the range spans nothing.
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `position` lies strictly between the ends.
    pub fn contains_position(&self, position: &Position) -> bool {
        position.is_after(&self.start) && position.is_before(&self.end)
    }

    /// Returns true if `other` lies within this range, ends included.
    pub fn contains_range(&self, other: &Range) -> bool {
        !other.start.is_before(&self.start)
            && !other.end.is_after(&self.end)
            && other.root() == self.root()
    }

    /// Returns true if the two ranges share at least one slot.
    pub fn is_intersecting(&self, other: &Range) -> bool {
        self.start.is_before(&other.end) && other.start.is_before(&self.end)
    }

    /// The shared part of two ranges.
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        if !self.is_intersecting(other) {
            return None;
        }

        let start = if other.start.is_after(&self.start) {
            &other.start
        } else {
            &self.start
        };
        let end = if other.end.is_before(&self.end) {
            &other.end
        } else {
            &self.end
        };
        Some(Range::new(start.clone(), end.clone()))
    }

    /// A walker bounded by this range.
    pub fn walker<'a>(
        &self,
        doc: &'a Document,
        merge_characters: bool,
    ) -> Result<TreeWalker<'a>, WalkerError> {
        TreeWalker::new(
            doc,
            TreeWalkerOptions::new()
                .with_boundaries(self.clone())
                .merge_characters(merge_characters),
        )
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quill_model::Attributes;
    use rstest::rstest;

    fn range(start: &[usize], end: &[usize]) -> Range {
        let root = NodeId::new(0);
        Range::new(
            Position::new(root, start.to_vec()).unwrap(),
            Position::new(root, end.to_vec()).unwrap(),
        )
    }

    #[test]
    fn test_collapsed() {
        assert!(range(&[1, 2], &[1, 2]).is_collapsed());
        assert!(!range(&[1, 2], &[1, 3]).is_collapsed());
    }

    #[rstest]
    #[case::inside(&[1, 1], true)]
    #[case::deeper_inside(&[1, 3, 0], true)]
    #[case::at_start(&[1, 0], false)]
    #[case::at_end(&[1, 4], false)]
    #[case::outside(&[2], false)]
    fn test_contains_position(#[case] path: &[usize], #[case] expected: bool) {
        let r = range(&[1, 0], &[1, 4]);
        let p = Position::new(NodeId::new(0), path.to_vec()).unwrap();
        assert_eq!(r.contains_position(&p), expected);
    }

    #[test]
    fn test_contains_range() {
        let outer = range(&[1], &[2]);
        assert!(outer.contains_range(&range(&[1, 0], &[1, 4])));
        assert!(outer.contains_range(&outer));
        assert!(!outer.contains_range(&range(&[0], &[1, 2])));
    }

    #[test]
    fn test_intersection() {
        let a = range(&[1, 0], &[1, 3]);
        let b = range(&[1, 2], &[1, 5]);

        assert!(a.is_intersecting(&b));
        assert_eq!(a.intersection(&b), Some(range(&[1, 2], &[1, 3])));
        assert_eq!(b.intersection(&a), Some(range(&[1, 2], &[1, 3])));
    }

    #[test]
    fn test_touching_ranges_do_not_intersect() {
        let a = range(&[1, 0], &[1, 2]);
        let b = range(&[1, 2], &[1, 5]);

        assert!(!a.is_intersecting(&b));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn test_different_roots_never_relate() {
        let a = range(&[0], &[5]);
        let other_root = NodeId::new(3);
        let b = Range::new(
            Position::new(other_root, vec![1]).unwrap(),
            Position::new(other_root, vec![2]).unwrap(),
        );

        assert!(!a.contains_range(&b));
        assert!(!a.is_intersecting(&b));
        assert!(!a.contains_position(b.start()));
    }

    #[test]
    fn test_element_ranges() {
        let mut doc = Document::new();
        let root = doc.create_root("root").unwrap();
        let p = doc.append_element(root, "p", Attributes::new()).unwrap();
        doc.append_text(p, "foo", Attributes::new()).unwrap();

        assert_eq!(Range::in_element(&doc, p).unwrap(), range(&[0, 0], &[0, 3]));
        assert_eq!(Range::in_element(&doc, root).unwrap(), range(&[0], &[1]));
        assert_eq!(Range::on_node(&doc, p).unwrap(), range(&[0], &[1]));
        assert_eq!(range(&[0, 0], &[0, 3]).to_string(), "[0,0] - [0,3]");
    }
}
