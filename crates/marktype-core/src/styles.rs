//! Active-style summary shown under the editor.

use marktype_doc::{BlockType, EditorState, StyleTag};

/// Styles in effect at the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStyles {
    /// Inline styles, in stored order
    pub inline: Vec<StyleTag>,
    /// Type of the focus block, when it is not plain
    pub block_type: Option<BlockType>,
}

impl ActiveStyles {
    /// Collects the styles active at the state's selection.
    pub fn of(state: &EditorState) -> Self {
        let block_type = state.focus_block().block_type();
        Self {
            inline: state.current_inline_style().iter().collect(),
            block_type: (!block_type.is_plain()).then_some(block_type),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.block_type.is_none()
    }
}

impl std::fmt::Display for ActiveStyles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self.inline.iter().map(|t| t.to_string()).collect();
        if let Some(block_type) = self.block_type {
            parts.push(block_type.as_str().to_uppercase());
        }
        f.write_str(&parts.join(", "))
    }
}

/// Renders the active styles as e.g. `"BOLD, UNDERLINE, HEADER-ONE"`.
///
/// Returns an empty string when nothing is active.
pub fn describe_active_styles(state: &EditorState) -> String {
    ActiveStyles::of(state).to_string()
}
