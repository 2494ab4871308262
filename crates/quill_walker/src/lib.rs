//! # quill_walker
//!
//! Locating, bounding and enumerating content of a Quill document tree.
//!
//! - [`Position`] - an immutable `(root, path)` coordinate
//! - [`Range`] - a `start..end` pair of positions
//! - [`TreeWalker`] - a lazy walker producing `ELEMENT_START`,
//!   `ELEMENT_END`, `CHARACTER` and `TEXT` events in either direction
//!
//! The walker never mutates the document and borrows it for its whole
//! lifetime, so the tree cannot change under an active walk.
//!
//! ## Example
//!
//! ```rust
//! use quill_model::{Attributes, Document};
//! use quill_walker::{Range, WalkerEventType};
//!
//! let mut doc = Document::new();
//! let root = doc.create_root("main").unwrap();
//! let p = doc.append_element(root, "p", Attributes::new()).unwrap();
//! doc.append_text(p, "foo", Attributes::new().with("bold", true)).unwrap();
//!
//! let range = Range::in_element(&doc, p).unwrap();
//! let events: Vec<_> = range.walker(&doc, true).unwrap().collect::<Result<_, _>>().unwrap();
//!
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].event_type, WalkerEventType::Text);
//! assert_eq!(events[0].item.as_text().unwrap().text(&doc).unwrap(), "foo");
//! ```

mod error;
mod position;
mod range;
mod value;
mod walker;

pub use error::WalkerError;
pub use position::{Position, PositionRelation};
pub use range::Range;
pub use value::{TextFragment, WalkerEventType, WalkerItem, WalkerValue};
pub use walker::{Backward, Direction, TreeWalker, TreeWalkerOptions, WalkerState};
