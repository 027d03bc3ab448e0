//! Editor state snapshots and the pure transformations between them.
//!
//! An [`EditorState`] is the document, the selection, and the inline style
//! the next typed character will receive when it differs from what the
//! surrounding text would give it (the "override"). Each operation returns a
//! new snapshot; callers replace their state wholesale.

use crate::block::{Block, BlockType};
use crate::document::Document;
use crate::selection::{Position, Selection};
use crate::style::{InlineStyle, StyleTag};
use crate::{DocError, DocResult};

/// A block index plus the character span selected inside it.
type Span = (usize, usize, usize);

/// Document + selection + pending inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    document: Document,
    selection: Selection,
    inline_override: Option<InlineStyle>,
}

impl EditorState {
    /// Creates a state with an empty document and the caret at its start.
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Wraps an existing document; the caret goes to its start.
    pub fn with_document(document: Document) -> Self {
        let selection = Selection::caret(document.start());
        Self {
            document,
            selection,
            inline_override: None,
        }
    }

    /// Builds a state from parts, checking that the selection fits the document.
    pub fn from_parts(document: Document, selection: Selection) -> DocResult<Self> {
        document.check_position(selection.anchor)?;
        document.check_position(selection.focus)?;
        Ok(Self {
            document,
            selection,
            inline_override: None,
        })
    }

    // ==================== Getters ====================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn inline_override(&self) -> Option<&InlineStyle> {
        self.inline_override.as_ref()
    }

    /// The block holding the selection focus.
    pub fn focus_block(&self) -> &Block {
        self.document
            .block(self.selection.focus.block)
            .unwrap_or_else(|| self.document.first_block())
    }

    /// Text of the focus block up to the caret.
    pub fn text_before_caret(&self) -> &str {
        self.focus_block().text_before(self.selection.focus.offset)
    }

    /// Moves the selection. Any pending inline style is dropped.
    pub fn with_selection(&self, selection: Selection) -> DocResult<Self> {
        Self::from_parts(self.document.clone(), selection)
    }

    /// Styles the next inserted character would receive.
    ///
    /// For a collapsed selection this is the pending override if set,
    /// otherwise the styles of the character before the caret (or of the
    /// first character when the caret is at the start of the block). An empty
    /// block starts unstyled. For a range it is the set of tags shared by
    /// every selected character.
    pub fn current_inline_style(&self) -> InlineStyle {
        if let Some(style) = &self.inline_override {
            return style.clone();
        }
        if self.selection.is_collapsed() {
            self.style_at_caret()
        } else {
            self.style_across_range()
        }
    }

    fn style_at_caret(&self) -> InlineStyle {
        let block = self.focus_block();
        match self.selection.focus.offset {
            0 if block.is_empty() => InlineStyle::new(),
            0 => block.styles_at(0),
            offset => block.styles_at(offset - 1),
        }
    }

    fn style_across_range(&self) -> InlineStyle {
        let Ok(spans) = self.selected_spans() else {
            return InlineStyle::new();
        };
        let mut common: Option<InlineStyle> = None;
        for (idx, from, to) in spans {
            let block = &self.document.blocks()[idx];
            for i in from..to {
                let here = block.styles_at(i);
                common = Some(match common {
                    Some(c) => c.intersect(&here),
                    None => here,
                });
            }
        }
        common.unwrap_or_default()
    }

    // ==================== Text ====================

    /// Replaces the characters covered by `selection` with unstyled `text`.
    ///
    /// A selection spanning several blocks merges them into the first one.
    /// The result has a caret right after the inserted text.
    pub fn replace_text_range(&self, selection: &Selection, text: &str) -> DocResult<Self> {
        self.replace_styled(selection, text, &InlineStyle::new())
    }

    /// Inserts `text` at the selection using the current inline style.
    pub fn insert_text(&self, text: &str) -> DocResult<Self> {
        let style = self.current_inline_style();
        self.replace_styled(&self.selection, text, &style)
    }

    fn replace_styled(
        &self,
        selection: &Selection,
        text: &str,
        style: &InlineStyle,
    ) -> DocResult<Self> {
        let (start, end) = self.document.ordered(selection)?;
        let start_idx = self.index_of(start)?;
        let end_idx = self.index_of(end)?;

        let mut document = self.document.clone();
        if start_idx == end_idx {
            document.block_mut(start_idx).remove(start.offset, end.offset);
        } else {
            let mut tail = document.blocks()[end_idx].clone();
            tail.remove(0, end.offset);
            let head = document.block_mut(start_idx);
            let len = head.len();
            head.remove(start.offset, len);
            head.append(&tail);
            document.remove_blocks(start_idx + 1, end_idx + 1);
        }
        document.block_mut(start_idx).insert(start.offset, text, style);

        let caret = Position::new(start.block, start.offset + text.chars().count());
        Ok(Self {
            document,
            selection: Selection::caret(caret),
            inline_override: None,
        })
    }

    // ==================== Inline styles ====================

    /// Toggles an inline style.
    ///
    /// On a caret this only flips the pending style for the next typed
    /// characters. On a range the tag is removed if every selected character
    /// already has it, and applied to the whole range otherwise.
    pub fn toggle_inline_style(&self, tag: StyleTag) -> DocResult<Self> {
        if self.selection.is_collapsed() {
            let mut style = self.current_inline_style();
            style.toggle(tag);
            return Ok(Self {
                inline_override: Some(style),
                ..self.clone()
            });
        }

        let spans: Vec<Span> = self
            .selected_spans()?
            .into_iter()
            .filter(|(_, from, to)| from < to)
            .collect();
        let everywhere = !spans.is_empty()
            && spans.iter().all(|&(idx, from, to)| {
                self.document.blocks()[idx].has_style_over(tag, from, to)
            });

        let mut document = self.document.clone();
        for (idx, from, to) in spans {
            let block = document.block_mut(idx);
            if everywhere {
                block.remove_style(tag, from, to);
            } else {
                block.apply_style(tag, from, to);
            }
        }
        Ok(Self {
            document,
            selection: self.selection,
            inline_override: None,
        })
    }

    // ==================== Blocks ====================

    /// Sets the type of every block touched by the selection.
    pub fn set_block_type(&self, block_type: BlockType) -> Self {
        let (first, last) = self.selected_block_indices();
        let mut document = self.document.clone();
        for idx in first..=last {
            document.block_mut(idx).set_block_type(block_type);
        }
        Self {
            document,
            selection: self.selection,
            inline_override: self.inline_override.clone(),
        }
    }

    /// Sets `block_type`, or reverts to plain if the focus block already has it.
    pub fn toggle_block_type(&self, block_type: BlockType) -> Self {
        let target = if self.focus_block().block_type() == block_type {
            BlockType::Unstyled
        } else {
            block_type
        };
        self.set_block_type(target)
    }

    /// Swaps in a new version of an existing block (matched by id).
    ///
    /// Selection offsets inside the block are clamped to its new length.
    pub fn replace_block(&self, block: Block) -> DocResult<Self> {
        let idx = self
            .document
            .block_index(block.id())
            .ok_or(DocError::BlockNotFound(block.id()))?;
        block.validate()?;

        let id = block.id();
        let len = block.len();
        let mut document = self.document.clone();
        *document.block_mut(idx) = block;

        let clamp = |p: Position| {
            if p.block == id {
                Position::new(id, p.offset.min(len))
            } else {
                p
            }
        };
        Ok(Self {
            document,
            selection: Selection::new(clamp(self.selection.anchor), clamp(self.selection.focus)),
            inline_override: None,
        })
    }

    /// Splits the focus block at the caret (the Enter key).
    ///
    /// Splitting at the end of a heading starts a plain block; other types
    /// carry over to the new block.
    pub fn split_block(&self) -> DocResult<Self> {
        let state = if self.selection.is_collapsed() {
            self.clone()
        } else {
            self.replace_text_range(&self.selection, "")?
        };
        let caret = state.selection.focus;
        let idx = state.index_of(caret)?;

        let mut document = state.document;
        let block = document.block_mut(idx);
        let at_end = caret.offset >= block.len();
        let tail_type = if at_end && block.block_type().is_heading() {
            BlockType::Unstyled
        } else {
            block.block_type()
        };
        let tail = block.split_off(caret.offset, tail_type);
        let tail_id = tail.id();
        document.insert_block(idx + 1, tail);

        Ok(Self {
            document,
            selection: Selection::caret(Position::new(tail_id, 0)),
            inline_override: None,
        })
    }

    /// Backspace.
    ///
    /// Deletes the selected range or the character before the caret. At the
    /// start of a styled block the block type is reset to plain first; at the
    /// start of a plain block it is merged into the previous block.
    pub fn delete_backward(&self) -> DocResult<Self> {
        if !self.selection.is_collapsed() {
            return self.replace_text_range(&self.selection, "");
        }
        let caret = self.selection.focus;
        if caret.offset > 0 {
            let range = Selection::new(Position::new(caret.block, caret.offset - 1), caret);
            return self.replace_text_range(&range, "");
        }

        let block = self.focus_block();
        if !block.block_type().is_plain() {
            return Ok(self.set_block_type(BlockType::Unstyled));
        }
        match self.document.block_before(block.id()) {
            Some(prev) => {
                let range = Selection::new(Position::new(prev.id(), prev.len()), caret);
                self.replace_text_range(&range, "")
            }
            None => Ok(self.clone()),
        }
    }

    // ==================== Helpers ====================

    fn index_of(&self, position: Position) -> DocResult<usize> {
        self.document
            .block_index(position.block)
            .ok_or(DocError::BlockNotFound(position.block))
    }

    /// First and last block index touched by the selection.
    fn selected_block_indices(&self) -> (usize, usize) {
        match self.document.ordered(&self.selection) {
            Ok((start, end)) => (
                self.index_of(start).unwrap_or(0),
                self.index_of(end).unwrap_or(0),
            ),
            Err(_) => {
                let idx = self.index_of(self.selection.focus).unwrap_or(0);
                (idx, idx)
            }
        }
    }

    /// Per-block character spans covered by the selection, in document order.
    fn selected_spans(&self) -> DocResult<Vec<Span>> {
        let (start, end) = self.document.ordered(&self.selection)?;
        let start_idx = self.index_of(start)?;
        let end_idx = self.index_of(end)?;
        Ok((start_idx..=end_idx)
            .map(|idx| {
                let from = if idx == start_idx { start.offset } else { 0 };
                let to = if idx == end_idx {
                    end.offset
                } else {
                    self.document.blocks()[idx].len()
                };
                (idx, from, to)
            })
            .collect())
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::StyleRange;

    fn state_with(blocks: Vec<Block>) -> EditorState {
        EditorState::with_document(Document::from_blocks(blocks).unwrap())
    }

    fn caret_at(state: &EditorState, block_idx: usize, offset: usize) -> EditorState {
        let id = state.document().blocks()[block_idx].id();
        state
            .with_selection(Selection::caret(Position::new(id, offset)))
            .unwrap()
    }

    #[test]
    fn test_insert_moves_caret() {
        let state = EditorState::new().insert_text("abc").unwrap();
        assert_eq!(state.selection().focus.offset, 3);
        assert_eq!(state.text_before_caret(), "abc");
    }

    #[test]
    fn test_replace_text_range_within_block() {
        let state = caret_at(&state_with(vec![Block::unstyled().with_text("hello***")]), 0, 8);
        let id = state.focus_block().id();
        let range = Selection::new(Position::new(id, 5), Position::new(id, 8));
        let next = state.replace_text_range(&range, "").unwrap();
        assert_eq!(next.focus_block().text(), "hello");
        assert_eq!(next.selection().focus, Position::new(id, 5));
    }

    #[test]
    fn test_replace_text_range_across_blocks_merges() {
        let state = state_with(vec![
            Block::unstyled().with_text("abc"),
            Block::unstyled().with_text("middle"),
            Block::new(BlockType::CodeBlock)
                .with_text("xyz")
                .with_style(StyleTag::Bold, 1, 3),
        ]);
        let ids: Vec<_> = state.document().blocks().iter().map(Block::id).collect();
        let range = Selection::new(Position::new(ids[2], 1), Position::new(ids[0], 1));
        let next = state.replace_text_range(&range, "-").unwrap();

        assert_eq!(next.document().len(), 1);
        let block = next.focus_block();
        assert_eq!(block.text(), "a-yz");
        assert_eq!(block.block_type(), BlockType::Unstyled);
        assert_eq!(block.styles(), &[StyleRange::new(StyleTag::Bold, 2, 4)]);
        assert_eq!(next.selection().focus, Position::new(ids[0], 2));
    }

    #[test]
    fn test_caret_style_comes_from_previous_char() {
        let state = caret_at(
            &state_with(vec![Block::unstyled().with_text("ab").with_style(StyleTag::Italic, 1, 2)]),
            0,
            2,
        );
        assert!(state.current_inline_style().contains(StyleTag::Italic));
        let at_one = caret_at(&state, 0, 1);
        assert!(at_one.current_inline_style().is_empty());
    }

    #[test]
    fn test_empty_block_starts_unstyled() {
        let state = caret_at(
            &state_with(vec![
                Block::unstyled().with_text("ab").with_style(StyleTag::Bold, 0, 2),
                Block::unstyled(),
            ]),
            1,
            0,
        );
        assert!(state.current_inline_style().is_empty());
        let at_start = caret_at(&state, 0, 0);
        assert!(at_start.current_inline_style().contains(StyleTag::Bold));
    }

    #[test]
    fn test_toggle_on_caret_twice_restores_style() {
        let state = EditorState::new();
        let on = state.toggle_inline_style(StyleTag::Bold).unwrap();
        assert!(on.current_inline_style().contains(StyleTag::Bold));
        let off = on.toggle_inline_style(StyleTag::Bold).unwrap();
        assert!(!off.current_inline_style().contains(StyleTag::Bold));
        assert_eq!(off.document(), state.document());
    }

    #[test]
    fn test_toggle_on_range_applies_then_removes() {
        let state = state_with(vec![Block::unstyled().with_text("abcd")]);
        let id = state.focus_block().id();
        let range = state
            .with_selection(Selection::new(Position::new(id, 1), Position::new(id, 3)))
            .unwrap();

        let styled = range.toggle_inline_style(StyleTag::Underline).unwrap();
        assert_eq!(
            styled.focus_block().styles(),
            &[StyleRange::new(StyleTag::Underline, 1, 3)]
        );
        assert!(styled.current_inline_style().contains(StyleTag::Underline));

        let cleared = styled.toggle_inline_style(StyleTag::Underline).unwrap();
        assert!(cleared.focus_block().styles().is_empty());
    }

    #[test]
    fn test_toggle_block_type_round_trip() {
        let state = EditorState::new();
        let heading = state.toggle_block_type(BlockType::HeaderOne);
        assert_eq!(heading.focus_block().block_type(), BlockType::HeaderOne);
        let plain = heading.toggle_block_type(BlockType::HeaderOne);
        assert_eq!(plain.focus_block().block_type(), BlockType::Unstyled);
    }

    #[test]
    fn test_replace_block_clamps_selection() {
        let state = caret_at(&state_with(vec![Block::unstyled().with_text("abc```")]), 0, 6);
        let mut block = state.focus_block().clone();
        block.clear();
        block.set_block_type(BlockType::CodeBlock);
        let next = state.replace_block(block).unwrap();
        assert_eq!(next.focus_block().block_type(), BlockType::CodeBlock);
        assert_eq!(next.selection().focus.offset, 0);
    }

    #[test]
    fn test_replace_unknown_block_fails() {
        let state = EditorState::new();
        let stranger = Block::unstyled();
        assert_eq!(
            state.replace_block(stranger.clone()),
            Err(DocError::BlockNotFound(stranger.id()))
        );
    }

    #[test]
    fn test_split_heading_at_end_starts_plain_block() {
        let state = EditorState::new()
            .set_block_type(BlockType::HeaderOne)
            .insert_text("Title")
            .unwrap()
            .split_block()
            .unwrap();
        assert_eq!(state.document().len(), 2);
        assert_eq!(state.document().blocks()[0].text(), "Title");
        assert_eq!(state.focus_block().block_type(), BlockType::Unstyled);
        assert_eq!(state.selection().focus.offset, 0);
    }

    #[test]
    fn test_split_code_block_keeps_type() {
        let state = EditorState::new()
            .set_block_type(BlockType::CodeBlock)
            .insert_text("let x = 1;")
            .unwrap()
            .split_block()
            .unwrap();
        assert_eq!(state.focus_block().block_type(), BlockType::CodeBlock);
    }

    #[test]
    fn test_backspace_resets_type_then_merges() {
        let state = state_with(vec![
            Block::unstyled().with_text("ab"),
            Block::new(BlockType::HeaderOne).with_text("cd"),
        ]);
        let state = caret_at(&state, 1, 0);

        let reset = state.delete_backward().unwrap();
        assert_eq!(reset.document().len(), 2);
        assert_eq!(reset.focus_block().block_type(), BlockType::Unstyled);

        let merged = reset.delete_backward().unwrap();
        assert_eq!(merged.document().len(), 1);
        assert_eq!(merged.focus_block().text(), "abcd");
        assert_eq!(merged.selection().focus.offset, 2);
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let state = EditorState::new();
        assert_eq!(state.delete_backward().unwrap(), state);
    }

    #[test]
    fn test_invalid_selection_is_rejected() {
        let state = EditorState::new();
        let id = state.focus_block().id();
        assert!(matches!(
            state.with_selection(Selection::caret(Position::new(id, 1))),
            Err(DocError::OffsetOutOfBounds { .. })
        ));
    }
}
