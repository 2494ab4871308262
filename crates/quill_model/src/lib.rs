//! # quill_model
//!
//! Tree storage for the Quill rich-text document model.
//!
//! A [`Document`] holds one or more named root elements. Elements have a
//! name, an attribute set and ordered children; children are elements or
//! text runs. A text run holds one or more characters sharing one
//! [`Attributes`] set and occupies one offset slot per character in its
//! parent, so a position can point between any two characters without the
//! run being split.
//!
//! ## Architecture
//!
//! - All nodes live in a single arena and are addressed by [`NodeId`]
//! - Parent links are plain ids, so the tree has no ownership cycles
//! - Each node caches its starting offset, making offset lookups a binary search
//!
//! ## Example
//!
//! ```rust
//! use quill_model::{Attributes, Document};
//!
//! let mut doc = Document::new();
//! let root = doc.create_root("main").unwrap();
//! let p = doc.append_element(root, "paragraph", Attributes::new()).unwrap();
//! doc.append_text(p, "foo", Attributes::new().with("bold", true)).unwrap();
//!
//! assert_eq!(doc.max_offset(p).unwrap(), 3);
//! assert_eq!(doc.path_to(p).unwrap(), vec![0]);
//! ```

mod attributes;
mod description;
mod document;
mod error;
mod node;

pub use attributes::Attributes;
pub use description::{DocumentSpec, ElementSpec, NodeSpec, TextSpec};
pub use document::Document;
pub use error::ModelError;
pub use node::{NodeId, NodeKind};
