//! # Marktype Doc
//!
//! Rich-text document model used by the marktype editor.
//!
//! ## Overview
//!
//! - A [`Document`] is a non-empty, ordered list of [`Block`]s.
//! - Each block carries a [`BlockType`], its text, and a list of
//!   [`StyleRange`]s annotating the text with [`StyleTag`]s.
//! - An [`EditorState`] pairs a document with a [`Selection`] and the
//!   pending inline style for the caret.
//!
//! Every transformation on [`EditorState`] takes `&self` and returns a new
//! snapshot. Nothing is mutated in place, so a caller can keep the previous
//! state around (the undo [`History`] does exactly that).
//!
//! All offsets are counted in `char`s, not bytes.

mod block;
mod document;
mod history;
mod selection;
mod state;
mod style;

pub use block::{Block, BlockId, BlockType, StyleRange};
pub use document::Document;
pub use history::{ChangeKind, History};
pub use selection::{Position, Selection};
pub use state::EditorState;
pub use style::{InlineStyle, StyleTag};

/// Result type for document operations
pub type DocResult<T> = Result<T, DocError>;

/// Errors raised when a document or selection would break its invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    #[error("Document must contain at least one block")]
    EmptyDocument,

    #[error("Duplicate block identifier: {0}")]
    DuplicateBlock(BlockId),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Offset {offset} is out of bounds for block {block} (length {len})")]
    OffsetOutOfBounds {
        block: BlockId,
        offset: usize,
        len: usize,
    },

    #[error("Style range {start}..{end} is out of bounds for block {block} (length {len})")]
    StyleRangeOutOfBounds {
        block: BlockId,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Unknown style tag: {0}")]
    UnknownStyle(String),

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
}
