//! Blocks: paragraph-like units with a type tag, text and inline style ranges.
//!
//! ## Style ranges
//!
//! Ranges are half-open (`start..end`) and counted in characters. Editing
//! operations keep them consistent with the text and call [`Block::normalize`]
//! afterwards, which merges touching ranges of the same tag and drops empty
//! ones. Ranges built by hand (or read from storage) are kept as given.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::style::{InlineStyle, StyleTag};
use crate::{DocError, DocResult};

/// Stable, opaque identifier of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Creates a new unique block ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classifies how a whole block is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockType {
    /// Plain paragraph
    #[default]
    #[serde(rename = "unstyled")]
    Unstyled,
    #[serde(rename = "header-one")]
    HeaderOne,
    #[serde(rename = "header-two")]
    HeaderTwo,
    #[serde(rename = "blockquote")]
    Blockquote,
    #[serde(rename = "code-block")]
    CodeBlock,
}

impl BlockType {
    pub const ALL: [BlockType; 5] = [
        BlockType::Unstyled,
        BlockType::HeaderOne,
        BlockType::HeaderTwo,
        BlockType::Blockquote,
        BlockType::CodeBlock,
    ];

    /// Returns the canonical type tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
        }
    }

    /// Returns true for the default paragraph type.
    pub fn is_plain(&self) -> bool {
        *self == BlockType::Unstyled
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, BlockType::HeaderOne | BlockType::HeaderTwo)
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DocError::UnknownBlockType(s.to_string()))
    }
}

/// A style applied to the characters `start..end` of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleRange {
    pub style: StyleTag,
    pub start: usize,
    pub end: usize,
}

impl StyleRange {
    pub fn new(style: StyleTag, start: usize, end: usize) -> Self {
        Self { style, start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns true if the character at `offset` is inside the range.
    pub fn covers(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// A paragraph-like unit of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    #[serde(rename = "type")]
    block_type: BlockType,
    text: String,
    #[serde(default)]
    styles: Vec<StyleRange>,
}

impl Block {
    /// Creates an empty block with a fresh identifier.
    pub fn new(block_type: BlockType) -> Self {
        Self::with_id(BlockId::new(), block_type)
    }

    pub fn with_id(id: BlockId, block_type: BlockType) -> Self {
        Self {
            id,
            block_type,
            text: String::new(),
            styles: Vec::new(),
        }
    }

    /// Empty plain paragraph.
    pub fn unstyled() -> Self {
        Self::new(BlockType::Unstyled)
    }

    /// Replaces the text (builder style). Existing ranges are kept as is.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a style range (builder style). Not normalized.
    pub fn with_style(mut self, style: StyleTag, start: usize, end: usize) -> Self {
        self.styles.push(StyleRange::new(style, start, end));
        self
    }

    // ==================== Getters ====================

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn styles(&self) -> &[StyleRange] {
        &self.styles
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the text before the character offset `offset`.
    pub fn text_before(&self, offset: usize) -> &str {
        &self.text[..self.byte_index(offset)]
    }

    /// Returns the styles covering the character at `offset`, in stored order.
    pub fn styles_at(&self, offset: usize) -> InlineStyle {
        self.styles
            .iter()
            .filter(|r| r.covers(offset))
            .map(|r| r.style)
            .collect()
    }

    /// Returns true if every character in `start..end` carries `tag`.
    pub fn has_style_over(&self, tag: StyleTag, start: usize, end: usize) -> bool {
        start < end
            && (start..end).all(|i| {
                self.styles
                    .iter()
                    .any(|r| r.style == tag && r.covers(i))
            })
    }

    /// Checks that every style range fits the text.
    pub fn validate(&self) -> DocResult<()> {
        let len = self.len();
        for range in &self.styles {
            if range.start > range.end || range.end > len {
                return Err(DocError::StyleRangeOutOfBounds {
                    block: self.id,
                    start: range.start,
                    end: range.end,
                    len,
                });
            }
        }
        Ok(())
    }

    // ==================== Editing ====================

    pub fn set_block_type(&mut self, block_type: BlockType) {
        self.block_type = block_type;
    }

    /// Inserts `text` at `offset`; the new characters carry exactly `style`.
    pub fn insert(&mut self, offset: usize, text: &str, style: &InlineStyle) {
        let n = text.chars().count();
        if n == 0 {
            return;
        }
        let offset = offset.min(self.len());
        let idx = self.byte_index(offset);
        self.text.insert_str(idx, text);

        let mut styles = Vec::with_capacity(self.styles.len() + style.len() + 1);
        for r in &self.styles {
            if r.end <= offset {
                styles.push(*r);
            } else if r.start >= offset {
                styles.push(StyleRange::new(r.style, r.start + n, r.end + n));
            } else {
                // Range straddles the insertion point.
                styles.push(StyleRange::new(r.style, r.start, offset));
                styles.push(StyleRange::new(r.style, offset + n, r.end + n));
            }
        }
        styles.extend(style.iter().map(|tag| StyleRange::new(tag, offset, offset + n)));
        self.styles = styles;
        self.normalize();
    }

    /// Removes the characters `start..end`.
    pub fn remove(&mut self, start: usize, end: usize) {
        let len = self.len();
        let end = end.min(len);
        let start = start.min(end);
        if start == end {
            return;
        }
        let (from, to) = (self.byte_index(start), self.byte_index(end));
        self.text.replace_range(from..to, "");

        let removed = end - start;
        let shift = |x: usize| {
            if x <= start {
                x
            } else if x >= end {
                x - removed
            } else {
                start
            }
        };
        for r in &mut self.styles {
            r.start = shift(r.start);
            r.end = shift(r.end);
        }
        self.normalize();
    }

    /// Removes all text and styles.
    pub fn clear(&mut self) {
        self.text.clear();
        self.styles.clear();
    }

    /// Applies `tag` to `start..end`.
    pub fn apply_style(&mut self, tag: StyleTag, start: usize, end: usize) {
        let end = end.min(self.len());
        if start >= end {
            return;
        }
        self.styles.push(StyleRange::new(tag, start, end));
        self.normalize();
    }

    /// Removes `tag` from `start..end`, splitting ranges where needed.
    pub fn remove_style(&mut self, tag: StyleTag, start: usize, end: usize) {
        let mut styles = Vec::with_capacity(self.styles.len() + 1);
        for r in &self.styles {
            if r.style != tag || r.end <= start || r.start >= end {
                styles.push(*r);
                continue;
            }
            if r.start < start {
                styles.push(StyleRange::new(tag, r.start, start));
            }
            if r.end > end {
                styles.push(StyleRange::new(tag, end, r.end));
            }
        }
        self.styles = styles;
        self.normalize();
    }

    /// Splits the block at `offset`.
    ///
    /// `self` keeps the head; the tail is returned as a new block of
    /// `tail_type` with a fresh identifier.
    pub fn split_off(&mut self, offset: usize, tail_type: BlockType) -> Block {
        let offset = offset.min(self.len());
        let idx = self.byte_index(offset);

        let mut tail = Block::new(tail_type).with_text(&self.text[idx..]);
        tail.styles = self
            .styles
            .iter()
            .filter(|r| r.end > offset)
            .map(|r| StyleRange::new(r.style, r.start.max(offset) - offset, r.end - offset))
            .collect();
        tail.normalize();

        let len = self.len();
        self.remove(offset, len);
        tail
    }

    /// Appends another block's text and styles to the end of this one.
    pub fn append(&mut self, other: &Block) {
        let shift = self.len();
        self.text.push_str(&other.text);
        self.styles.extend(
            other
                .styles
                .iter()
                .map(|r| StyleRange::new(r.style, r.start + shift, r.end + shift)),
        );
        self.normalize();
    }

    /// Merges overlapping or touching ranges per tag and drops empty ones.
    ///
    /// Tags keep the order of their first appearance.
    pub fn normalize(&mut self) {
        let mut order: Vec<StyleTag> = Vec::new();
        for r in self.styles.iter().filter(|r| !r.is_empty()) {
            if !order.contains(&r.style) {
                order.push(r.style);
            }
        }

        let mut styles = Vec::with_capacity(self.styles.len());
        for tag in order {
            let mut spans: Vec<(usize, usize)> = self
                .styles
                .iter()
                .filter(|r| r.style == tag && !r.is_empty())
                .map(|r| (r.start, r.end))
                .collect();
            spans.sort_unstable();

            let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
            for (start, end) in spans {
                match merged.last_mut() {
                    Some(last) if start <= last.1 => last.1 = last.1.max(end),
                    _ => merged.push((start, end)),
                }
            }
            styles.extend(merged.into_iter().map(|(s, e)| StyleRange::new(tag, s, e)));
        }
        self.styles = styles;
    }

    /// Converts a character offset to a byte index, clamping to the end.
    fn byte_index(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> InlineStyle {
        [StyleTag::Bold].into_iter().collect()
    }

    #[test]
    fn test_block_type_tags() {
        assert_eq!("header-one".parse::<BlockType>().unwrap(), BlockType::HeaderOne);
        assert_eq!(BlockType::CodeBlock.to_string(), "code-block");
        assert!("header-seven".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_insert_extends_matching_style() {
        let mut block = Block::unstyled()
            .with_text("ab")
            .with_style(StyleTag::Bold, 0, 2);
        block.insert(2, "cd", &bold());
        assert_eq!(block.text(), "abcd");
        assert_eq!(block.styles(), &[StyleRange::new(StyleTag::Bold, 0, 4)]);
    }

    #[test]
    fn test_insert_unstyled_splits_range() {
        let mut block = Block::unstyled()
            .with_text("abcd")
            .with_style(StyleTag::Underline, 0, 4);
        block.insert(2, "X", &InlineStyle::new());
        assert_eq!(block.text(), "abXcd");
        assert_eq!(
            block.styles(),
            &[
                StyleRange::new(StyleTag::Underline, 0, 2),
                StyleRange::new(StyleTag::Underline, 3, 5),
            ]
        );
    }

    #[test]
    fn test_remove_shifts_and_clamps_ranges() {
        let mut block = Block::unstyled()
            .with_text("hello world")
            .with_style(StyleTag::Bold, 3, 8)
            .with_style(StyleTag::Italic, 9, 11);
        block.remove(2, 6);
        assert_eq!(block.text(), "heworld");
        assert_eq!(
            block.styles(),
            &[
                StyleRange::new(StyleTag::Bold, 2, 4),
                StyleRange::new(StyleTag::Italic, 5, 7),
            ]
        );
    }

    #[test]
    fn test_remove_drops_fully_covered_range() {
        let mut block = Block::unstyled()
            .with_text("ab**")
            .with_style(StyleTag::RedText, 2, 4);
        block.remove(2, 4);
        assert_eq!(block.text(), "ab");
        assert!(block.styles().is_empty());
    }

    #[test]
    fn test_multibyte_offsets() {
        let mut block = Block::unstyled().with_text("héllo");
        assert_eq!(block.len(), 5);
        assert_eq!(block.text_before(2), "hé");
        block.remove(1, 2);
        assert_eq!(block.text(), "hllo");
    }

    #[test]
    fn test_remove_style_splits() {
        let mut block = Block::unstyled()
            .with_text("abcdef")
            .with_style(StyleTag::Bold, 0, 6);
        block.remove_style(StyleTag::Bold, 2, 4);
        assert_eq!(
            block.styles(),
            &[
                StyleRange::new(StyleTag::Bold, 0, 2),
                StyleRange::new(StyleTag::Bold, 4, 6),
            ]
        );
        assert!(!block.has_style_over(StyleTag::Bold, 0, 6));
        assert!(block.has_style_over(StyleTag::Bold, 4, 6));
    }

    #[test]
    fn test_styles_at_uses_stored_order() {
        let block = Block::unstyled()
            .with_text("abc")
            .with_style(StyleTag::Underline, 0, 3)
            .with_style(StyleTag::Bold, 1, 3);
        let tags: Vec<_> = block.styles_at(2).iter().collect();
        assert_eq!(tags, vec![StyleTag::Underline, StyleTag::Bold]);
        assert_eq!(block.styles_at(0).iter().collect::<Vec<_>>(), vec![StyleTag::Underline]);
    }

    #[test]
    fn test_split_and_append() {
        let mut head = Block::unstyled()
            .with_text("abcdef")
            .with_style(StyleTag::Bold, 2, 5);
        let tail = head.split_off(3, BlockType::Unstyled);
        assert_eq!(head.text(), "abc");
        assert_eq!(head.styles(), &[StyleRange::new(StyleTag::Bold, 2, 3)]);
        assert_eq!(tail.text(), "def");
        assert_eq!(tail.styles(), &[StyleRange::new(StyleTag::Bold, 0, 2)]);

        head.append(&tail);
        assert_eq!(head.text(), "abcdef");
        assert_eq!(head.styles(), &[StyleRange::new(StyleTag::Bold, 2, 5)]);
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_range() {
        let block = Block::unstyled()
            .with_text("ab")
            .with_style(StyleTag::Bold, 1, 5);
        assert!(matches!(
            block.validate(),
            Err(DocError::StyleRangeOutOfBounds { end: 5, len: 2, .. })
        ));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(usize, String, bool),
            Remove(usize, usize),
            Style(usize, usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0usize..20, "[a-z*`#é ]{0,4}", any::<bool>())
                    .prop_map(|(at, text, bold)| Op::Insert(at, text, bold)),
                (0usize..20, 0usize..20).prop_map(|(a, b)| Op::Remove(a.min(b), a.max(b))),
                (0usize..20, 0usize..20).prop_map(|(a, b)| Op::Style(a.min(b), a.max(b))),
            ]
        }

        proptest! {
            #[test]
            fn edits_keep_ranges_in_bounds(ops in proptest::collection::vec(op(), 0..24)) {
                let mut block = Block::unstyled();
                for op in ops {
                    match op {
                        Op::Insert(at, text, bold) => {
                            let style = if bold { super::bold() } else { InlineStyle::new() };
                            block.insert(at, &text, &style);
                        }
                        Op::Remove(a, b) => block.remove(a, b),
                        Op::Style(a, b) => block.apply_style(StyleTag::Underline, a, b),
                    }
                    prop_assert!(block.validate().is_ok());
                    prop_assert!(block.styles().iter().all(|r| !r.is_empty()));
                }
            }
        }
    }
}
