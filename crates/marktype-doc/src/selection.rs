//! Caret and range selection.
//!
//! A selection has an anchor (where it started) and a focus (where the caret
//! is). Both are block-relative positions. Whether the selection runs
//! forward or backward depends on block order, so ordering the endpoints
//! is done by [`Document::ordered`](crate::Document::ordered).

use serde::{Deserialize, Serialize};

use crate::block::BlockId;

/// A point in the document: a block and a character offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub block: BlockId,
    pub offset: usize,
}

impl Position {
    pub fn new(block: BlockId, offset: usize) -> Self {
        Self { block, offset }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}

/// Anchor and focus of the user's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed selection at `position`.
    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position,
            focus: position,
        }
    }

    /// Returns true if anchor and focus coincide.
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Returns true if either endpoint lies in `block`.
    pub fn touches(&self, block: BlockId) -> bool {
        self.anchor.block == block || self.focus.block == block
    }
}
