//! Values produced by the tree walker.

use std::fmt;

use quill_model::{Attributes, Document, ModelError, NodeId};
use serde::Serialize;

use crate::Position;

/// Kind of a walker event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalkerEventType {
    /// Entering an element.
    ElementStart,
    /// Leaving an element.
    ElementEnd,
    /// A single character, reported when characters are not merged.
    Character,
    /// Adjacent characters with equal attributes, reported when merging.
    Text,
}

impl WalkerEventType {
    pub const fn as_str(self) -> &'static str {
        match self {
            WalkerEventType::ElementStart => "ELEMENT_START",
            WalkerEventType::ElementEnd => "ELEMENT_END",
            WalkerEventType::Character => "CHARACTER",
            WalkerEventType::Text => "TEXT",
        }
    }
}

impl fmt::Display for WalkerEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span of characters inside one element.
///
/// The span may cover several adjacent text runs when they share attributes;
/// `first_run` and `last_run` are the runs holding its first and last
/// character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFragment {
    parent: NodeId,
    first_run: NodeId,
    last_run: NodeId,
    start: usize,
    end: usize,
}

impl TextFragment {
    pub(crate) fn new(
        parent: NodeId,
        first_run: NodeId,
        last_run: NodeId,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            parent,
            first_run,
            last_run,
            start,
            end,
        }
    }

    #[inline]
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    #[inline]
    pub fn first_run(&self) -> NodeId {
        self.first_run
    }

    #[inline]
    pub fn last_run(&self) -> NodeId {
        self.last_run
    }

    /// Offset of the first character in the parent.
    #[inline]
    pub fn start_offset(&self) -> usize {
        self.start
    }

    /// Offset one past the last character in the parent.
    #[inline]
    pub fn end_offset(&self) -> usize {
        self.end
    }

    /// Number of characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The characters of the fragment.
    pub fn text(&self, doc: &Document) -> Result<String, ModelError> {
        doc.text_between(self.parent, self.start, self.end)
    }

    /// Attributes shared by every character of the fragment.
    pub fn attributes<'d>(&self, doc: &'d Document) -> Result<&'d Attributes, ModelError> {
        doc.attributes(self.first_run)
    }
}

/// What an event reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WalkerItem {
    Element(NodeId),
    Text(TextFragment),
}

impl WalkerItem {
    pub fn as_element(&self) -> Option<NodeId> {
        match self {
            WalkerItem::Element(id) => Some(*id),
            WalkerItem::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextFragment> {
        match self {
            WalkerItem::Text(fragment) => Some(fragment),
            WalkerItem::Element(_) => None,
        }
    }
}

/// One step of a walk.
///
/// `previous_position` and `next_position` are the positions directly
/// before and after the reported item, independent of the direction the
/// walker moved in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkerValue {
    #[serde(rename = "type")]
    pub event_type: WalkerEventType,
    pub item: WalkerItem,
    /// 1 for element starts, the character count for text, absent for
    /// element ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    pub previous_position: Position,
    pub next_position: Position,
}

impl WalkerValue {
    pub(crate) fn element_start(
        element: NodeId,
        previous_position: Position,
        next_position: Position,
    ) -> Self {
        Self {
            event_type: WalkerEventType::ElementStart,
            item: WalkerItem::Element(element),
            length: Some(1),
            previous_position,
            next_position,
        }
    }

    pub(crate) fn element_end(
        element: NodeId,
        previous_position: Position,
        next_position: Position,
    ) -> Self {
        Self {
            event_type: WalkerEventType::ElementEnd,
            item: WalkerItem::Element(element),
            length: None,
            previous_position,
            next_position,
        }
    }

    pub(crate) fn text(
        event_type: WalkerEventType,
        fragment: TextFragment,
        previous_position: Position,
        next_position: Position,
    ) -> Self {
        Self {
            event_type,
            item: WalkerItem::Text(fragment),
            length: Some(fragment.len()),
            previous_position,
            next_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(WalkerEventType::ElementStart.to_string(), "ELEMENT_START");
        assert_eq!(WalkerEventType::ElementEnd.to_string(), "ELEMENT_END");
        assert_eq!(WalkerEventType::Character.to_string(), "CHARACTER");
        assert_eq!(
            serde_json::to_string(&WalkerEventType::Text).unwrap(),
            r#""TEXT""#
        );
    }

    #[test]
    fn test_element_end_has_no_length() {
        let root = NodeId::new(0);
        let value = WalkerValue::element_end(
            NodeId::new(1),
            Position::new(root, vec![0, 0]).unwrap(),
            Position::new(root, vec![1]).unwrap(),
        );

        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["type"], "ELEMENT_END");
        assert!(json.get("length").is_none());
        assert_eq!(json["previousPosition"]["path"], serde_json::json!([0, 0]));
    }

    #[test]
    fn test_fragment_accessors() {
        let mut doc = Document::new();
        let root = doc.create_root("root").unwrap();
        let bold = Attributes::new().with("bold", true);
        let first = doc.append_text(root, "fo", bold.clone()).unwrap();
        let last = doc.append_text(root, "oz", bold.clone()).unwrap();

        let fragment = TextFragment::new(root, first, last, 1, 3);
        assert_eq!(fragment.len(), 2);
        assert!(!fragment.is_empty());
        assert_eq!(fragment.text(&doc).unwrap(), "oo");
        assert_eq!(fragment.attributes(&doc).unwrap(), &bold);
        assert_eq!(WalkerItem::Text(fragment).as_text(), Some(&fragment));
        assert_eq!(WalkerItem::Text(fragment).as_element(), None);
    }
}
