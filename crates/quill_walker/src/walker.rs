//! Bidirectional tree walker.
//!
//! The walker keeps a single cursor [`Position`] and computes each event
//! from it on demand. Moving forward from a cursor:
//!
//! 1. at or past `boundaries.end` the walk is done;
//! 2. before an element it reports `ELEMENT_START` and descends to offset 0;
//! 3. after the last child of an element it reports `ELEMENT_END` and
//!    ascends past the element (at the end of a root the walk is done);
//! 4. before or inside a text run it reports one `CHARACTER`, or with
//!    merging one `TEXT` covering every following character that has the
//!    same attributes, cut at the boundary.
//!
//! Moving backward mirrors these rules. After a step the cursor sits on the
//! event's `next_position` (forward) or `previous_position` (backward), so
//! directions can be alternated on one walker.

use quill_model::{Document, NodeId};
use tracing::{debug, trace, warn};

use crate::{Position, Range, TextFragment, WalkerError, WalkerEventType, WalkerValue};

/// Options for [`TreeWalker::new`].
///
/// At least one of `boundaries` or `position` is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeWalkerOptions {
    /// Span the walk may not leave.
    pub boundaries: Option<Range>,
    /// Starting cursor. Defaults to the boundary the first step moves away
    /// from: `boundaries.start` going forward, `boundaries.end` going back.
    pub position: Option<Position>,
    /// Report adjacent characters with equal attributes as one `TEXT` event.
    pub merge_characters: bool,
}

impl TreeWalkerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boundaries(mut self, boundaries: Range) -> Self {
        self.boundaries = Some(boundaries);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn merge_characters(mut self, yes: bool) -> Self {
        self.merge_characters = yes;
        self
    }
}

/// Travel direction of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// Lifecycle of a walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkerState {
    /// No step has been taken yet.
    Initialized,
    /// The last step produced an event.
    Active,
    /// The last step found nothing more to report in its direction.
    Exhausted,
}

#[derive(Debug, Clone)]
struct Cursor {
    position: Position,
    /// Element resolved from `position`.
    parent: NodeId,
}

/// Lazy, bidirectional iterator over the structure of a document.
///
/// [`Iterator::next`] walks forward and [`TreeWalker::previous`] walks
/// backward. Both return `None` once nothing is left in that direction,
/// which corresponds to an iterator result with `done = true`.
///
/// # Example
///
/// ```rust
/// use quill_model::{Attributes, Document};
/// use quill_walker::{Position, TreeWalker, TreeWalkerOptions, WalkerEventType};
///
/// let mut doc = Document::new();
/// let root = doc.create_root("main").unwrap();
/// let p = doc.append_element(root, "p", Attributes::new()).unwrap();
/// doc.append_text(p, "hi", Attributes::new()).unwrap();
///
/// let start = Position::new(root, vec![0]).unwrap();
/// let walker = TreeWalker::new(&doc, TreeWalkerOptions::new().with_position(start)).unwrap();
/// let types: Vec<_> = walker.map(|v| v.unwrap().event_type).collect();
///
/// assert_eq!(
///     types,
///     vec![
///         WalkerEventType::ElementStart,
///         WalkerEventType::Character,
///         WalkerEventType::Character,
///         WalkerEventType::ElementEnd,
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TreeWalker<'a> {
    doc: &'a Document,
    boundaries: Option<Range>,
    start_position: Option<Position>,
    merge_characters: bool,
    cursor: Option<Cursor>,
    state: WalkerState,
    failed: bool,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker over `doc`.
    ///
    /// Fails with [`WalkerError::NoStartPosition`] when the options carry
    /// neither boundaries nor a position.
    pub fn new(doc: &'a Document, options: TreeWalkerOptions) -> Result<Self, WalkerError> {
        let TreeWalkerOptions {
            boundaries,
            position,
            merge_characters,
        } = options;

        if boundaries.is_none() && position.is_none() {
            return Err(WalkerError::NoStartPosition);
        }

        if let Some(boundaries) = &boundaries {
            if boundaries.start().root() != boundaries.end().root() {
                return Err(WalkerError::RootMismatch);
            }
            if let Some(position) = &position {
                if position.root() != boundaries.root() {
                    return Err(WalkerError::RootMismatch);
                }
                if position.is_before(boundaries.start()) || position.is_after(boundaries.end())
                {
                    return Err(WalkerError::PositionOutOfBoundaries {
                        path: position.path().to_vec(),
                    });
                }
            }
        }

        debug!(
            "TreeWalker: boundaries={:?}, position={:?}, merge_characters={}",
            boundaries.as_ref().map(ToString::to_string),
            position.as_ref().map(ToString::to_string),
            merge_characters
        );

        Ok(Self {
            doc,
            boundaries,
            start_position: position,
            merge_characters,
            cursor: None,
            state: WalkerState::Initialized,
            failed: false,
        })
    }

    #[inline]
    pub fn boundaries(&self) -> Option<&Range> {
        self.boundaries.as_ref()
    }

    #[inline]
    pub fn merges_characters(&self) -> bool {
        self.merge_characters
    }

    #[inline]
    pub fn state(&self) -> WalkerState {
        self.state
    }

    /// Current cursor, or the explicit starting position before the first step.
    pub fn position(&self) -> Option<&Position> {
        self.cursor
            .as_ref()
            .map(|c| &c.position)
            .or(self.start_position.as_ref())
    }

    /// Steps backward. `None` means the walk is done in this direction.
    pub fn previous(&mut self) -> Option<Result<WalkerValue, WalkerError>> {
        self.step(Direction::Backward)
    }

    /// Iterator adapter stepping backward through this walker.
    pub fn backward(&mut self) -> Backward<'_, 'a> {
        Backward { walker: self }
    }

    /// Steps in `direction`.
    ///
    /// After an error the walker stays exhausted in both directions.
    pub fn step(&mut self, direction: Direction) -> Option<Result<WalkerValue, WalkerError>> {
        if self.failed {
            return None;
        }

        let result = match direction {
            Direction::Forward => self.step_forward(),
            Direction::Backward => self.step_backward(),
        };

        match result {
            Ok(Some(value)) => {
                trace!(
                    "{} {} -> {}",
                    value.event_type, value.previous_position, value.next_position
                );
                self.state = WalkerState::Active;
                Some(Ok(value))
            }
            Ok(None) => {
                self.state = WalkerState::Exhausted;
                None
            }
            Err(err) => {
                warn!("TreeWalker stopped: {}", err);
                self.failed = true;
                self.state = WalkerState::Exhausted;
                Some(Err(err))
            }
        }
    }

    fn cursor_for(&mut self, direction: Direction) -> Result<Cursor, WalkerError> {
        if let Some(cursor) = &self.cursor {
            return Ok(cursor.clone());
        }

        let position = match (&self.start_position, &self.boundaries, direction) {
            (Some(position), _, _) => position.clone(),
            (None, Some(boundaries), Direction::Forward) => boundaries.start().clone(),
            (None, Some(boundaries), Direction::Backward) => boundaries.end().clone(),
            (None, None, _) => return Err(WalkerError::NoStartPosition),
        };

        let parent = position.parent(self.doc)?;
        let cursor = Cursor { position, parent };
        self.cursor = Some(cursor.clone());
        Ok(cursor)
    }

    fn step_forward(&mut self) -> Result<Option<WalkerValue>, WalkerError> {
        let cursor = self.cursor_for(Direction::Forward)?;
        if let Some(boundaries) = &self.boundaries {
            if !cursor.position.is_before(boundaries.end()) {
                return Ok(None);
            }
        }

        let doc = self.doc;
        let root = cursor.position.root();
        let offset = cursor.position.offset();
        let max_offset = doc.max_offset(cursor.parent)?;

        if offset > max_offset {
            return Err(WalkerError::invalid_position(
                &cursor.position,
                "offset is past the end of its parent",
            ));
        }

        if offset == max_offset {
            let Some(grandparent) = doc.parent(cursor.parent) else {
                return Ok(None);
            };

            // Slot of the element we are leaving, moved past it.
            let mut path = cursor.position.parent_path().to_vec();
            if let Some(last) = path.last_mut() {
                *last += 1;
            }
            let next_position = Position::from_parts(root, path);

            let value = WalkerValue::element_end(
                cursor.parent,
                cursor.position,
                next_position.clone(),
            );
            self.cursor = Some(Cursor {
                position: next_position,
                parent: grandparent,
            });
            return Ok(Some(value));
        }

        let Some((child, _)) = doc.child_at_offset(cursor.parent, offset)? else {
            return Err(WalkerError::invalid_position(
                &cursor.position,
                "no child at offset",
            ));
        };

        if doc.is_element(child) {
            let mut path = cursor.position.path().to_vec();
            path.push(0);
            let next_position = Position::from_parts(root, path);

            let value =
                WalkerValue::element_start(child, cursor.position, next_position.clone());
            self.cursor = Some(Cursor {
                position: next_position,
                parent: child,
            });
            return Ok(Some(value));
        }

        let mut end = if self.merge_characters {
            self.merged_end(cursor.parent, child)?
        } else {
            offset + 1
        };
        if let Some(boundaries) = &self.boundaries {
            if let Some(limit) = upper_limit(boundaries.end(), &cursor.position) {
                if limit <= offset {
                    return Err(WalkerError::invalid_position(
                        boundaries.end(),
                        "boundary descends through a text run",
                    ));
                }
                end = end.min(limit);
            }
        }

        let last_run = match doc.child_at_offset(cursor.parent, end - 1)? {
            Some((run, _)) => run,
            None => child,
        };
        let fragment = TextFragment::new(cursor.parent, child, last_run, offset, end);
        let next_position = cursor.position.with_offset(end);

        let value = WalkerValue::text(
            self.text_event_type(),
            fragment,
            cursor.position,
            next_position.clone(),
        );
        self.cursor = Some(Cursor {
            position: next_position,
            parent: cursor.parent,
        });
        Ok(Some(value))
    }

    fn step_backward(&mut self) -> Result<Option<WalkerValue>, WalkerError> {
        let cursor = self.cursor_for(Direction::Backward)?;
        if let Some(boundaries) = &self.boundaries {
            if !cursor.position.is_after(boundaries.start()) {
                return Ok(None);
            }
        }

        let doc = self.doc;
        let root = cursor.position.root();
        let offset = cursor.position.offset();

        if offset > doc.max_offset(cursor.parent)? {
            return Err(WalkerError::invalid_position(
                &cursor.position,
                "offset is past the end of its parent",
            ));
        }

        if offset == 0 {
            let Some(grandparent) = doc.parent(cursor.parent) else {
                return Ok(None);
            };

            let previous_position =
                Position::from_parts(root, cursor.position.parent_path().to_vec());

            let value = WalkerValue::element_start(
                cursor.parent,
                previous_position.clone(),
                cursor.position,
            );
            self.cursor = Some(Cursor {
                position: previous_position,
                parent: grandparent,
            });
            return Ok(Some(value));
        }

        let Some((child, _)) = doc.child_at_offset(cursor.parent, offset - 1)? else {
            return Err(WalkerError::invalid_position(
                &cursor.position,
                "no child before offset",
            ));
        };

        if doc.is_element(child) {
            let mut path = cursor.position.path().to_vec();
            if let Some(last) = path.last_mut() {
                *last = offset - 1;
            }
            path.push(doc.max_offset(child)?);
            let previous_position = Position::from_parts(root, path);

            let value =
                WalkerValue::element_end(child, previous_position.clone(), cursor.position);
            self.cursor = Some(Cursor {
                position: previous_position,
                parent: child,
            });
            return Ok(Some(value));
        }

        let mut start = if self.merge_characters {
            self.merged_start(cursor.parent, child)?
        } else {
            offset - 1
        };
        if let Some(boundaries) = &self.boundaries {
            if let Some(limit) = lower_limit(boundaries.start(), &cursor.position) {
                if limit >= offset {
                    return Err(WalkerError::invalid_position(
                        boundaries.start(),
                        "boundary descends through a text run",
                    ));
                }
                start = start.max(limit);
            }
        }

        let first_run = match doc.child_at_offset(cursor.parent, start)? {
            Some((run, _)) => run,
            None => child,
        };
        let fragment = TextFragment::new(cursor.parent, first_run, child, start, offset);
        let previous_position = cursor.position.with_offset(start);

        let value = WalkerValue::text(
            self.text_event_type(),
            fragment,
            previous_position.clone(),
            cursor.position,
        );
        self.cursor = Some(Cursor {
            position: previous_position,
            parent: cursor.parent,
        });
        Ok(Some(value))
    }

    fn text_event_type(&self) -> WalkerEventType {
        if self.merge_characters {
            WalkerEventType::Text
        } else {
            WalkerEventType::Character
        }
    }

    /// End offset of `run` extended over following runs with equal attributes.
    fn merged_end(&self, parent: NodeId, run: NodeId) -> Result<usize, WalkerError> {
        let doc = self.doc;
        let attributes = doc.attributes(run)?;
        let mut end = doc.start_offset(run)? + doc.offset_size(run)?;

        while let Some((next, _)) = doc.child_at_offset(parent, end)? {
            if !doc.is_text(next) || doc.attributes(next)? != attributes {
                break;
            }
            end += doc.offset_size(next)?;
        }
        Ok(end)
    }

    /// Start offset of `run` extended over preceding runs with equal attributes.
    fn merged_start(&self, parent: NodeId, run: NodeId) -> Result<usize, WalkerError> {
        let doc = self.doc;
        let attributes = doc.attributes(run)?;
        let mut start = doc.start_offset(run)?;

        while start > 0 {
            match doc.child_at_offset(parent, start - 1)? {
                Some((prev, _)) if doc.is_text(prev) && doc.attributes(prev)? == attributes => {
                    start = doc.start_offset(prev)?;
                }
                _ => break,
            }
        }
        Ok(start)
    }
}

/// Slot in the cursor's parent that a boundary lies at or below.
fn boundary_slot(boundary: &Position, cursor: &Position) -> Option<(usize, bool)> {
    let parent_path = cursor.parent_path();
    let path = boundary.path();
    if boundary.root() != cursor.root()
        || path.len() <= parent_path.len()
        || !path.starts_with(parent_path)
    {
        return None;
    }
    let nested = path.len() > parent_path.len() + 1;
    Some((path[parent_path.len()], nested))
}

/// Highest offset a forward text event may reach in the cursor's parent.
fn upper_limit(end: &Position, cursor: &Position) -> Option<usize> {
    boundary_slot(end, cursor).map(|(slot, _)| slot)
}

/// Lowest offset a backward text event may reach in the cursor's parent.
fn lower_limit(start: &Position, cursor: &Position) -> Option<usize> {
    boundary_slot(start, cursor).map(|(slot, nested)| if nested { slot + 1 } else { slot })
}

impl Iterator for TreeWalker<'_> {
    type Item = Result<WalkerValue, WalkerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step(Direction::Forward)
    }
}

/// Iterator returned by [`TreeWalker::backward`].
#[derive(Debug)]
pub struct Backward<'w, 'a> {
    walker: &'w mut TreeWalker<'a>,
}

impl Iterator for Backward<'_, '_> {
    type Item = Result<WalkerValue, WalkerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.walker.previous()
    }
}
