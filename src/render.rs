//! Terminal rendering of documents.

use marktype_core::{StyleMap, Treatment};
use marktype_doc::{Block, EditorState, InlineStyle, StyleTag};

const RESET: &str = "\x1b[0m";

/// Renders every block on its own line, prefixed with its type.
///
/// Blocks holding an end of the selection are marked with `>`.
pub fn render_document(state: &EditorState, map: &StyleMap, color: bool) -> String {
    state
        .document()
        .blocks()
        .iter()
        .map(|block| {
            let marker = if state.selection().touches(block.id()) { '>' } else { ' ' };
            let text = render_block(block, map, color);
            format!("{marker} {:>12} | {}", block.block_type().as_str(), text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders one block's text, with ANSI styling when `color` is set.
pub fn render_block(block: &Block, map: &StyleMap, color: bool) -> String {
    if !color {
        return block.text().to_string();
    }

    let base = map.block(block.block_type());
    let mut out = String::new();
    let mut current: Option<InlineStyle> = None;
    for (i, ch) in block.text().chars().enumerate() {
        let styles = block.styles_at(i);
        if current.as_ref() != Some(&styles) {
            let tags: Vec<StyleTag> = styles.iter().collect();
            let inline = map.combine(&tags);
            out.push_str(RESET);
            out.push_str(&sgr(base, &inline));
            current = Some(styles);
        }
        out.push(ch);
    }
    if current.is_some() {
        out.push_str(RESET);
    }
    out
}

/// SGR escape for a block treatment overlaid with an inline one.
fn sgr(base: &Treatment, inline: &Treatment) -> String {
    let mut codes = String::new();
    if base.bold || inline.bold {
        codes.push_str("\x1b[1m");
    }
    if base.italic || inline.italic {
        codes.push_str("\x1b[3m");
    }
    if base.underline || inline.underline {
        codes.push_str("\x1b[4m");
    }
    if let Some(fg) = inline.foreground.or(base.foreground) {
        codes.push_str(&fg.ansi_fg());
    }
    codes
}
