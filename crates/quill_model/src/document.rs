//! Arena-backed document tree.
//!
//! Every node of every root lives in one `Vec`, addressed by [`NodeId`].
//! Children are owned by position in their parent's child list; the parent
//! link stored on each node is a plain index and never keeps anything alive.
//!
//! Offsets follow the per-character model: an element occupies one offset
//! slot in its parent, a text run of N characters occupies N slots.

use tracing::debug;

use crate::node::NodeEntry;
use crate::{Attributes, ModelError, NodeId, NodeKind};

/// A set of named root elements and everything below them.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    roots: Vec<NodeId>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new root element.
    pub fn create_root(&mut self, name: impl Into<String>) -> Result<NodeId, ModelError> {
        let name = name.into();
        if self.root(&name).is_some() {
            return Err(ModelError::DuplicateRoot(name));
        }

        let id = self.alloc(NodeEntry {
            parent: None,
            start_offset: 0,
            attributes: Attributes::new(),
            kind: NodeKind::Element {
                name,
                children: Vec::new(),
                max_offset: 0,
            },
        });
        self.roots.push(id);
        debug!("Created root {}", id);

        Ok(id)
    }

    /// Appends an element as the last child of `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        attributes: Attributes,
    ) -> Result<NodeId, ModelError> {
        self.append(
            parent,
            attributes,
            NodeKind::Element {
                name: name.into(),
                children: Vec::new(),
                max_offset: 0,
            },
        )
    }

    /// Appends a text run as the last child of `parent`.
    ///
    /// Adjacent runs are never joined; two runs with equal attributes stay
    /// two nodes and are only coalesced when a walker merges characters.
    pub fn append_text(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
        attributes: Attributes,
    ) -> Result<NodeId, ModelError> {
        let data = text.into();
        let char_len = data.chars().count();
        if char_len == 0 {
            return Err(ModelError::EmptyText);
        }

        self.append(parent, attributes, NodeKind::Text { data, char_len })
    }

    fn append(
        &mut self,
        parent: NodeId,
        attributes: Attributes,
        kind: NodeKind,
    ) -> Result<NodeId, ModelError> {
        let start_offset = self.max_offset(parent)?;
        let size = kind.offset_size();

        let id = self.alloc(NodeEntry {
            parent: Some(parent),
            start_offset,
            attributes,
            kind,
        });

        if let NodeKind::Element {
            children,
            max_offset,
            ..
        } = &mut self.nodes[parent.index()].kind
        {
            children.push(id);
            *max_offset += size;
        }

        Ok(id)
    }

    fn alloc(&mut self, entry: NodeEntry) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(entry);
        id
    }

    fn entry(&self, id: NodeId) -> Result<&NodeEntry, ModelError> {
        self.nodes
            .get(id.index())
            .ok_or(ModelError::UnknownNode(id))
    }

    /// Looks up a root element by name.
    pub fn root(&self, name: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|&id| self.name(id) == Some(name))
    }

    /// All roots, in creation order.
    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Returns the payload of a node.
    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, ModelError> {
        self.entry(id).map(|e| &e.kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.kind(id).is_ok_and(NodeKind::is_element)
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Ok(NodeKind::Text { .. }))
    }

    /// Returns true for elements created with [`Document::create_root`].
    pub fn is_root(&self, id: NodeId) -> bool {
        self.entry(id).is_ok_and(|e| e.parent.is_none())
    }

    /// Element name. `None` for text runs.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Ok(NodeKind::Element { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// Characters of a text run. `None` for elements.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Ok(NodeKind::Text { data, .. }) => Some(data),
            _ => None,
        }
    }

    /// Child nodes of an element. Empty for text runs.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            Ok(NodeKind::Element { children, .. }) => children,
            _ => &[],
        }
    }

    pub fn attributes(&self, id: NodeId) -> Result<&Attributes, ModelError> {
        self.entry(id).map(|e| &e.attributes)
    }

    /// The containing element, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).ok().and_then(|e| e.parent)
    }

    /// Offset slots the node occupies in its parent.
    pub fn offset_size(&self, id: NodeId) -> Result<usize, ModelError> {
        self.entry(id).map(|e| e.kind.offset_size())
    }

    /// First offset slot the node occupies in its parent.
    pub fn start_offset(&self, id: NodeId) -> Result<usize, ModelError> {
        self.entry(id).map(|e| e.start_offset)
    }

    /// Offset slots occupied by all children of an element.
    pub fn max_offset(&self, id: NodeId) -> Result<usize, ModelError> {
        match self.kind(id)? {
            NodeKind::Element { max_offset, .. } => Ok(*max_offset),
            NodeKind::Text { .. } => Err(ModelError::NotAnElement(id)),
        }
    }

    /// Finds the child occupying `offset` inside `parent`.
    ///
    /// Returns the child together with the offset relative to the child's
    /// first slot (always 0 for elements). `None` when `offset` is at or
    /// past the end of the parent.
    pub fn child_at_offset(
        &self,
        parent: NodeId,
        offset: usize,
    ) -> Result<Option<(NodeId, usize)>, ModelError> {
        let children = match self.kind(parent)? {
            NodeKind::Element { children, .. } => children,
            NodeKind::Text { .. } => return Err(ModelError::NotAnElement(parent)),
        };

        let index = children.partition_point(|&child| {
            let entry = &self.nodes[child.index()];
            entry.start_offset + entry.kind.offset_size() <= offset
        });

        Ok(children.get(index).map(|&child| {
            let start = self.nodes[child.index()].start_offset;
            (child, offset - start)
        }))
    }

    /// Offset path from the node's root to the slot before the node.
    ///
    /// Roots have an empty path.
    pub fn path_to(&self, id: NodeId) -> Result<Vec<usize>, ModelError> {
        let mut path = Vec::new();
        let mut current = self.entry(id)?;
        while let Some(parent) = current.parent {
            path.push(current.start_offset);
            current = self.entry(parent)?;
        }
        path.reverse();
        Ok(path)
    }

    /// The root element the node belongs to.
    pub fn root_of(&self, id: NodeId) -> Result<NodeId, ModelError> {
        let mut current = id;
        let mut entry = self.entry(id)?;
        while let Some(parent) = entry.parent {
            current = parent;
            entry = self.entry(parent)?;
        }
        Ok(current)
    }

    /// Concatenates the characters found in `[start, end)` of `parent`.
    ///
    /// Elements inside the span contribute nothing.
    pub fn text_between(
        &self,
        parent: NodeId,
        start: usize,
        end: usize,
    ) -> Result<String, ModelError> {
        let mut out = String::new();
        for &child in self.children_checked(parent)? {
            let entry = &self.nodes[child.index()];
            let NodeKind::Text { data, char_len } = &entry.kind else {
                continue;
            };

            let lo = start.max(entry.start_offset);
            let hi = end.min(entry.start_offset + char_len);
            if lo < hi {
                out.extend(data.chars().skip(lo - entry.start_offset).take(hi - lo));
            }
        }
        Ok(out)
    }

    fn children_checked(&self, id: NodeId) -> Result<&[NodeId], ModelError> {
        match self.kind(id)? {
            NodeKind::Element { children, .. } => Ok(children),
            NodeKind::Text { .. } => Err(ModelError::NotAnElement(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// root
    ///  |- img1
    ///  |- p
    ///     |- "ba" (bold)
    ///     |- "r"
    ///     |- img2
    ///     |- "x"
    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.create_root("root").unwrap();
        doc.append_element(root, "img1", Attributes::new()).unwrap();
        let p = doc.append_element(root, "p", Attributes::new()).unwrap();
        doc.append_text(p, "ba", Attributes::new().with("bold", true))
            .unwrap();
        doc.append_text(p, "r", Attributes::new()).unwrap();
        let img2 = doc.append_element(p, "img2", Attributes::new()).unwrap();
        doc.append_text(p, "x", Attributes::new()).unwrap();
        (doc, root, p, img2)
    }

    #[test]
    fn test_offsets() {
        let (doc, root, p, img2) = sample();

        assert_eq!(doc.max_offset(root).unwrap(), 2);
        assert_eq!(doc.max_offset(p).unwrap(), 5);
        assert_eq!(doc.max_offset(img2).unwrap(), 0);
        assert_eq!(doc.start_offset(img2).unwrap(), 3);
        assert_eq!(doc.children(p).len(), 4);
    }

    #[test]
    fn test_child_at_offset() {
        let (doc, _, p, img2) = sample();
        let ba = doc.children(p)[0];
        let x = doc.children(p)[3];

        assert_eq!(doc.child_at_offset(p, 0).unwrap(), Some((ba, 0)));
        assert_eq!(doc.child_at_offset(p, 1).unwrap(), Some((ba, 1)));
        assert_eq!(doc.child_at_offset(p, 3).unwrap(), Some((img2, 0)));
        assert_eq!(doc.child_at_offset(p, 4).unwrap(), Some((x, 0)));
        assert_eq!(doc.child_at_offset(p, 5).unwrap(), None);
        assert_eq!(doc.child_at_offset(img2, 0).unwrap(), None);
    }

    #[test]
    fn test_child_at_offset_rejects_text_parent() {
        let (doc, _, p, _) = sample();
        let ba = doc.children(p)[0];
        assert_eq!(
            doc.child_at_offset(ba, 0),
            Err(ModelError::NotAnElement(ba))
        );
    }

    #[test]
    fn test_paths() {
        let (doc, root, p, img2) = sample();

        assert_eq!(doc.path_to(root).unwrap(), Vec::<usize>::new());
        assert_eq!(doc.path_to(p).unwrap(), vec![1]);
        assert_eq!(doc.path_to(img2).unwrap(), vec![1, 3]);
        assert_eq!(doc.root_of(img2).unwrap(), root);
        assert_eq!(doc.parent(img2), Some(p));
        assert_eq!(doc.parent(root), None);
    }

    #[test]
    fn test_text_between() {
        let (doc, _, p, _) = sample();

        assert_eq!(doc.text_between(p, 0, 2).unwrap(), "ba");
        assert_eq!(doc.text_between(p, 1, 3).unwrap(), "ar");
        assert_eq!(doc.text_between(p, 0, 5).unwrap(), "barx");
        assert_eq!(doc.text_between(p, 3, 4).unwrap(), "");
    }

    #[test]
    fn test_multibyte_text_is_counted_in_chars() {
        let mut doc = Document::new();
        let root = doc.create_root("root").unwrap();
        let run = doc.append_text(root, "日本語", Attributes::new()).unwrap();

        assert_eq!(doc.offset_size(run).unwrap(), 3);
        assert_eq!(doc.max_offset(root).unwrap(), 3);
        assert_eq!(doc.text_between(root, 1, 2).unwrap(), "本");
    }

    #[test]
    fn test_roots() {
        let mut doc = Document::new();
        let main = doc.create_root("main").unwrap();
        let title = doc.create_root("title").unwrap();

        assert_eq!(doc.root("main"), Some(main));
        assert_eq!(doc.root("title"), Some(title));
        assert_eq!(doc.root("missing"), None);
        assert_eq!(doc.roots(), &[main, title]);
        assert!(doc.is_root(main));
        assert_eq!(
            doc.create_root("main"),
            Err(ModelError::DuplicateRoot("main".to_string()))
        );
    }

    #[test]
    fn test_append_errors() {
        let mut doc = Document::new();
        let root = doc.create_root("root").unwrap();
        let run = doc.append_text(root, "a", Attributes::new()).unwrap();

        assert_eq!(
            doc.append_text(root, "", Attributes::new()),
            Err(ModelError::EmptyText)
        );
        assert_eq!(
            doc.append_element(run, "p", Attributes::new()),
            Err(ModelError::NotAnElement(run))
        );
        assert_eq!(
            doc.append_element(NodeId::new(99), "p", Attributes::new()),
            Err(ModelError::UnknownNode(NodeId::new(99)))
        );
    }

    #[test]
    fn test_accessors() {
        let (doc, root, p, _) = sample();
        let ba = doc.children(p)[0];

        assert_eq!(doc.name(p), Some("p"));
        assert_eq!(doc.name(ba), None);
        assert_eq!(doc.text(ba), Some("ba"));
        assert_eq!(doc.text(p), None);
        assert!(doc.is_element(root));
        assert!(doc.is_text(ba));
        assert!(doc.children(ba).is_empty());
        assert_eq!(
            doc.attributes(ba).unwrap(),
            &Attributes::new().with("bold", true)
        );
        assert_eq!(doc.len(), 7);
        assert!(doc.contains(ba));
        assert!(!doc.contains(NodeId::new(7)));
    }
}
