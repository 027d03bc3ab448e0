//! Property tests for the shortcut engine and persistence.

use marktype_core::shortcut::{evaluate, Outcome, ShortcutKind};
use marktype_core::storage::{decode, encode};
use marktype_doc::{Block, BlockType, Document, EditorState, Position, Selection, StyleTag};
use proptest::prelude::*;

fn state_with(block_type: BlockType, text: &str, anchor: usize, focus: usize) -> EditorState {
    let block = Block::new(block_type).with_text(text);
    let id = block.id();
    EditorState::with_document(Document::from_blocks(vec![block]).unwrap())
        .with_selection(Selection::new(Position::new(id, anchor), Position::new(id, focus)))
        .unwrap()
}

fn block_type() -> impl Strategy<Value = BlockType> {
    prop::sample::select(BlockType::ALL.to_vec())
}

fn style_tag() -> impl Strategy<Value = StyleTag> {
    prop::sample::select(StyleTag::ALL.to_vec())
}

fn block() -> impl Strategy<Value = Block> {
    ("[a-z*#` ]{0,12}", block_type(), prop::collection::vec((style_tag(), 0usize..12, 0usize..12), 0..4))
        .prop_map(|(text, block_type, ranges)| {
            let len = text.chars().count();
            ranges.into_iter().fold(
                Block::new(block_type).with_text(text),
                |block, (tag, a, b)| {
                    let (start, end) = (a.min(b).min(len), a.max(b).min(len));
                    block.with_style(tag, start, end)
                },
            )
        })
}

proptest! {
    #[test]
    fn range_selections_never_fire(
        text in "[a-z*#` ]{2,12}",
        block_type in block_type(),
        a in 0usize..12,
        b in 0usize..12,
    ) {
        let len = text.chars().count();
        let (a, b) = (a.min(len), b.min(len));
        prop_assume!(a != b);
        let state = state_with(block_type, &text, a, b);
        prop_assert_eq!(evaluate(&state, ' '), Outcome::PassThrough);
    }

    #[test]
    fn only_space_triggers(text in "[a-z*#` ]{0,12}", ch in "[^ ]") {
        let len = text.chars().count();
        let state = state_with(BlockType::Unstyled, &text, len, len);
        let ch = ch.chars().next().unwrap();
        prop_assert_eq!(evaluate(&state, ch), Outcome::PassThrough);
    }

    #[test]
    fn red_text_suffix_is_removed(prefix in "[a-z ]{0,12}") {
        let text = format!("{prefix}**");
        let len = text.chars().count();
        let state = state_with(BlockType::Unstyled, &text, len, len);

        let Outcome::Handled(t) = evaluate(&state, ' ') else {
            return Err(TestCaseError::fail("expected a shortcut"));
        };
        prop_assert_eq!(t.rule, ShortcutKind::RedText);
        prop_assert_eq!(t.state.focus_block().text(), prefix.as_str());
        prop_assert_eq!(t.state.selection().focus.offset, prefix.chars().count());
        prop_assert!(t.state.current_inline_style().contains(StyleTag::RedText));
    }

    #[test]
    fn underline_suffix_is_removed(prefix in "[a-z ]{0,12}") {
        let text = format!("{prefix}***");
        let len = text.chars().count();
        let state = state_with(BlockType::Unstyled, &text, len, len);

        let Outcome::Handled(t) = evaluate(&state, ' ') else {
            return Err(TestCaseError::fail("expected a shortcut"));
        };
        prop_assert_eq!(t.rule, ShortcutKind::Underline);
        prop_assert_eq!(t.state.focus_block().len(), len - 3);
        prop_assert_eq!(t.state.focus_block().text(), prefix.as_str());
        let style = t.state.current_inline_style();
        prop_assert!(style.contains(StyleTag::Underline));
        prop_assert!(!style.contains(StyleTag::RedText));
    }

    #[test]
    fn lone_star_starts_bold_in_any_block(block_type in block_type()) {
        let state = state_with(block_type, "*", 1, 1);

        let Outcome::Handled(t) = evaluate(&state, ' ') else {
            return Err(TestCaseError::fail("expected a shortcut"));
        };
        prop_assert_eq!(t.rule, ShortcutKind::Bold);
        prop_assert_eq!(t.state.focus_block().text(), "");
        prop_assert_eq!(t.state.focus_block().block_type(), block_type);
        prop_assert!(t.state.current_inline_style().contains(StyleTag::Bold));
    }

    #[test]
    fn lone_hash_toggles_heading(block_type in block_type()) {
        let state = state_with(block_type, "#", 1, 1);

        let Outcome::Handled(t) = evaluate(&state, ' ') else {
            return Err(TestCaseError::fail("expected a shortcut"));
        };
        prop_assert_eq!(t.rule, ShortcutKind::HeadingOne);
        prop_assert_eq!(t.state.focus_block().text(), "");
        let expected = if block_type == BlockType::HeaderOne {
            BlockType::Unstyled
        } else {
            BlockType::HeaderOne
        };
        prop_assert_eq!(t.state.focus_block().block_type(), expected);
    }

    #[test]
    fn saved_documents_load_back(blocks in prop::collection::vec(block(), 1..5)) {
        let document = Document::from_blocks(blocks).unwrap();
        let json = encode(&document).unwrap();
        prop_assert_eq!(decode(&json), Some(document));
    }
}
