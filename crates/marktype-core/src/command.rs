//! Command system for editor actions.
//!
//! ## Learning: The Command Pattern
//!
//! Commands encapsulate actions as values, so toolbar buttons, key bindings
//! and scripted input can all funnel through [`Editor::execute`].
//!
//! [`Editor::execute`]: crate::editor::Editor::execute

use marktype_doc::{BlockType, StyleTag};

/// Built-in editor commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // Typing
    InsertText(String),
    InsertNewline,
    DeleteBackward,

    // Formatting
    ToggleInlineStyle(StyleTag),
    ToggleBlockType(BlockType),

    // History
    Undo,
    Redo,

    // Storage
    Save,

    DismissNotification,
}

impl Command {
    pub const TOGGLE_BOLD: Command = Command::ToggleInlineStyle(StyleTag::Bold);
    pub const TOGGLE_ITALIC: Command = Command::ToggleInlineStyle(StyleTag::Italic);
    pub const TOGGLE_UNDERLINE: Command = Command::ToggleInlineStyle(StyleTag::Underline);
    pub const TOGGLE_RED_TEXT: Command = Command::ToggleInlineStyle(StyleTag::RedText);

    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::InsertText(_) => "Insert Text",
            Command::InsertNewline => "New Line",
            Command::DeleteBackward => "Delete Backward",
            Command::ToggleInlineStyle(tag) => match tag {
                StyleTag::Bold => "Bold",
                StyleTag::Italic => "Italic",
                StyleTag::Underline => "Underline",
                StyleTag::RedText => "Red Text",
            },
            Command::ToggleBlockType(block_type) => match block_type {
                BlockType::Unstyled => "Plain Text",
                BlockType::HeaderOne => "Heading 1",
                BlockType::HeaderTwo => "Heading 2",
                BlockType::Blockquote => "Quote",
                BlockType::CodeBlock => "Code Block",
            },
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Save => "Save",
            Command::DismissNotification => "Dismiss Notification",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display_name() {
        assert_eq!(Command::Save.display_name(), "Save");
        assert_eq!(Command::TOGGLE_RED_TEXT.display_name(), "Red Text");
        assert_eq!(
            Command::ToggleBlockType(BlockType::CodeBlock).to_string(),
            "Code Block"
        );
    }
}
