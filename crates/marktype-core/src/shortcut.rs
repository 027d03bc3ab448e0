//! Markdown-like typing shortcuts.
//!
//! ## How it works
//!
//! The engine runs before a typed character is inserted. When the character
//! is a space and the selection is a caret, the text of the caret's block is
//! checked against the rule table in priority order. The first rule that
//! matches rewrites the block (removing the trigger pattern and changing a
//! style or block type) and the space itself is swallowed. Otherwise the
//! caller inserts the character as usual.
//!
//! Three-character patterns come before their two-character prefixes so
//! `***` is never read as `**`.
//!
//! ```text
//!  keystroke ──► evaluate(state, ch) ──► PassThrough ──► insert ch
//!                        │
//!                        └──────────► Handled(new state, rule)
//! ```

use marktype_doc::{BlockType, DocResult, EditorState, Position, Selection, StyleTag};

/// The character that fires shortcuts.
pub const TRIGGER_CHAR: char = ' ';

/// Identifies which shortcut fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutKind {
    Bold,
    HeadingOne,
    Underline,
    RedText,
    CodeBlock,
    ExitCodeBlock,
}

impl ShortcutKind {
    /// Name shown in the transient notification.
    pub fn name(&self) -> &'static str {
        match self {
            ShortcutKind::Bold => "Bold",
            ShortcutKind::HeadingOne => "Heading-1",
            ShortcutKind::Underline => "Underline",
            ShortcutKind::RedText => "Red Text",
            ShortcutKind::CodeBlock => "code-block",
            ShortcutKind::ExitCodeBlock => "Plain Text",
        }
    }
}

impl std::fmt::Display for ShortcutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a rule's pattern is compared against the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// The whole block text must equal the pattern.
    WholeBlock,
    /// The text before the caret must end with the pattern.
    Suffix,
}

/// What a rule does once its pattern is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Flip an inline style for the text typed next.
    ToggleInlineStyle(StyleTag),
    /// Give the block a type, or make it plain if it already has it.
    ToggleBlockType(BlockType),
    /// Give the block a type.
    SetBlockType(BlockType),
    /// Give the block a type and drop all of its text.
    ClearIntoBlockType(BlockType),
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct TriggerRule {
    pub kind: ShortcutKind,
    pub pattern: &'static str,
    pub matcher: Matcher,
    /// Block type the caret's block must already have
    pub precondition: Option<BlockType>,
    pub action: Action,
    /// User-facing explanation for the shortcut guide
    pub description: &'static str,
}

/// The rules, in priority order.
pub const RULES: [TriggerRule; 6] = [
    TriggerRule {
        kind: ShortcutKind::Bold,
        pattern: "*",
        matcher: Matcher::WholeBlock,
        precondition: None,
        action: Action::ToggleInlineStyle(StyleTag::Bold),
        description: "Bold the text after typing * and space.",
    },
    TriggerRule {
        kind: ShortcutKind::HeadingOne,
        pattern: "#",
        matcher: Matcher::WholeBlock,
        precondition: None,
        action: Action::ToggleBlockType(BlockType::HeaderOne),
        description: "Change the line to Heading 1 after typing # and space.",
    },
    TriggerRule {
        kind: ShortcutKind::Underline,
        pattern: "***",
        matcher: Matcher::Suffix,
        precondition: None,
        action: Action::ToggleInlineStyle(StyleTag::Underline),
        description: "Underline text after typing *** and space.",
    },
    TriggerRule {
        kind: ShortcutKind::RedText,
        pattern: "**",
        matcher: Matcher::Suffix,
        precondition: None,
        action: Action::ToggleInlineStyle(StyleTag::RedText),
        description: "Turn text red after typing ** and space.",
    },
    TriggerRule {
        kind: ShortcutKind::CodeBlock,
        pattern: "```",
        matcher: Matcher::Suffix,
        precondition: None,
        action: Action::ClearIntoBlockType(BlockType::CodeBlock),
        description: "Create a code block after typing ``` and space.",
    },
    TriggerRule {
        kind: ShortcutKind::ExitCodeBlock,
        pattern: "``",
        matcher: Matcher::Suffix,
        precondition: Some(BlockType::CodeBlock),
        action: Action::SetBlockType(BlockType::Unstyled),
        description: "Remove a code block after typing `` and space within a code block.",
    },
];

/// Result of running the engine on one keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No rule matched; insert the character normally.
    PassThrough,
    /// A rule rewrote the state; do not insert the character.
    Handled(Transition),
}

impl Outcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }
}

/// The new state produced by a fired rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: EditorState,
    pub rule: ShortcutKind,
}

impl TriggerRule {
    /// Returns true if this rule fires for the given caret state.
    pub fn matches(&self, state: &EditorState) -> bool {
        let block = state.focus_block();
        if self
            .precondition
            .is_some_and(|required| block.block_type() != required)
        {
            return false;
        }
        match self.matcher {
            Matcher::WholeBlock => block.text() == self.pattern,
            Matcher::Suffix => state.text_before_caret().ends_with(self.pattern),
        }
    }

    /// Removes the pattern and applies the action as a single rewrite.
    pub fn apply(&self, state: &EditorState) -> DocResult<EditorState> {
        match self.action {
            Action::ToggleInlineStyle(tag) => self.strip(state)?.toggle_inline_style(tag),
            Action::ToggleBlockType(block_type) => {
                Ok(self.strip(state)?.toggle_block_type(block_type))
            }
            Action::SetBlockType(block_type) => Ok(self.strip(state)?.set_block_type(block_type)),
            Action::ClearIntoBlockType(block_type) => {
                let mut cleared = state.focus_block().clone();
                cleared.clear();
                cleared.set_block_type(block_type);
                state.replace_block(cleared)
            }
        }
    }

    /// Removes the characters the pattern occupies.
    fn strip(&self, state: &EditorState) -> DocResult<EditorState> {
        let caret = state.selection().focus;
        let consumed = match self.matcher {
            Matcher::WholeBlock => Selection::new(
                Position::new(caret.block, 0),
                Position::new(caret.block, state.focus_block().len()),
            ),
            Matcher::Suffix => {
                let start = caret.offset.saturating_sub(self.pattern.chars().count());
                Selection::new(Position::new(caret.block, start), caret)
            }
        };
        state.replace_text_range(&consumed, "")
    }
}

/// Runs the shortcut engine for one typed character.
///
/// Total over its inputs: anything that does not match a rule, including a
/// range selection or a character other than space, yields
/// [`Outcome::PassThrough`].
pub fn evaluate(state: &EditorState, typed: char) -> Outcome {
    if typed != TRIGGER_CHAR || !state.selection().is_collapsed() {
        return Outcome::PassThrough;
    }

    let Some(rule) = RULES.iter().find(|rule| rule.matches(state)) else {
        return Outcome::PassThrough;
    };

    match rule.apply(state) {
        Ok(next) => {
            tracing::debug!(rule = rule.kind.name(), "shortcut fired");
            Outcome::Handled(Transition {
                state: next,
                rule: rule.kind,
            })
        }
        Err(e) => {
            tracing::warn!("Shortcut {} could not be applied: {}", rule.kind, e);
            Outcome::PassThrough
        }
    }
}

/// The user-visible (pattern, description) list, in display order.
pub fn shortcut_guide() -> Vec<(&'static str, &'static str)> {
    const DISPLAY_ORDER: [ShortcutKind; 6] = [
        ShortcutKind::Bold,
        ShortcutKind::HeadingOne,
        ShortcutKind::RedText,
        ShortcutKind::Underline,
        ShortcutKind::CodeBlock,
        ShortcutKind::ExitCodeBlock,
    ];
    DISPLAY_ORDER
        .iter()
        .filter_map(|kind| RULES.iter().find(|r| r.kind == *kind))
        .map(|r| (r.pattern, r.description))
        .collect()
}
