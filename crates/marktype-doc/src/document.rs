//! The document: a non-empty ordered sequence of blocks.

use std::collections::HashSet;

use crate::block::{Block, BlockId};
use crate::selection::{Position, Selection};
use crate::{DocError, DocResult};

/// An ordered, non-empty list of blocks with unique identifiers.
///
/// The invariants are checked by [`Document::from_blocks`]; every other way
/// of building or changing a document preserves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Creates a document holding one empty plain block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::unstyled()],
        }
    }

    /// Builds a document from blocks, checking every invariant.
    pub fn from_blocks(blocks: Vec<Block>) -> DocResult<Self> {
        let document = Self { blocks };
        document.validate()?;
        Ok(document)
    }

    /// Checks non-emptiness, identifier uniqueness and style range bounds.
    pub fn validate(&self) -> DocResult<()> {
        if self.blocks.is_empty() {
            return Err(DocError::EmptyDocument);
        }
        let mut seen = HashSet::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if !seen.insert(block.id()) {
                return Err(DocError::DuplicateBlock(block.id()));
            }
            block.validate()?;
        }
        Ok(())
    }

    // ==================== Getters ====================

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks (always at least one).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn block_index(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    pub fn first_block(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Returns the block before `id`, if any.
    pub fn block_before(&self, id: BlockId) -> Option<&Block> {
        let idx = self.block_index(id)?;
        idx.checked_sub(1).map(|i| &self.blocks[i])
    }

    /// All text, one line per block.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns true if the document is a single empty block.
    pub fn is_blank(&self) -> bool {
        self.blocks.len() == 1 && self.blocks[0].is_empty()
    }

    // ==================== Positions ====================

    /// Checks that `position` names an existing block and an in-bounds offset.
    pub fn check_position(&self, position: Position) -> DocResult<()> {
        let block = self
            .block(position.block)
            .ok_or(DocError::BlockNotFound(position.block))?;
        let len = block.len();
        if position.offset > len {
            return Err(DocError::OffsetOutOfBounds {
                block: position.block,
                offset: position.offset,
                len,
            });
        }
        Ok(())
    }

    /// Position at the start of the document.
    pub fn start(&self) -> Position {
        Position::new(self.first_block().id(), 0)
    }

    /// Position at the end of the document.
    pub fn end(&self) -> Position {
        let last = self.last_block();
        Position::new(last.id(), last.len())
    }

    /// Returns the selection's endpoints in document order.
    pub fn ordered(&self, selection: &Selection) -> DocResult<(Position, Position)> {
        self.check_position(selection.anchor)?;
        self.check_position(selection.focus)?;
        let key = |p: &Position| (self.block_index(p.block).unwrap_or(0), p.offset);
        if key(&selection.anchor) <= key(&selection.focus) {
            Ok((selection.anchor, selection.focus))
        } else {
            Ok((selection.focus, selection.anchor))
        }
    }

    // ==================== Crate-internal mutation ====================

    pub(crate) fn block_mut(&mut self, idx: usize) -> &mut Block {
        &mut self.blocks[idx]
    }

    pub(crate) fn insert_block(&mut self, idx: usize, block: Block) {
        self.blocks.insert(idx, block);
    }

    /// Removes the blocks in `from..to`; never empties the document.
    pub(crate) fn remove_blocks(&mut self, from: usize, to: usize) {
        if to > from && to - from < self.blocks.len() {
            self.blocks.drain(from..to);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
