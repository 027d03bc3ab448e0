//! Undo/redo history over editor state snapshots.
//!
//! Because [`EditorState`] values are immutable snapshots, undo is simply
//! "go back to the snapshot taken before the change". Consecutive typing (or
//! consecutive backspaces) inside the coalescing window collapses into one
//! undo step, so undo removes a word rather than a single letter.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::state::EditorState;

/// What kind of change produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Characters typed at the caret
    InsertCharacters,
    /// Backspace
    Backspace,
    /// Enter
    SplitBlock,
    /// A typing shortcut rewrote the block
    ShortcutRewrite,
    /// An explicit inline style toggle
    ChangeInlineStyle,
    /// An explicit block type toggle
    ChangeBlockType,
}

impl ChangeKind {
    fn coalesces(&self) -> bool {
        matches!(self, ChangeKind::InsertCharacters | ChangeKind::Backspace)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    /// State before the change
    before: EditorState,
    kind: ChangeKind,
    /// None prevents coalescing (entries restored by redo)
    timestamp: Option<Instant>,
}

/// Bounded undo/redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Entry>,
    redo_stack: Vec<Entry>,
    max_size: usize,
    coalesce_threshold: Duration,
}

impl History {
    /// Creates a history keeping at most `max_size` undo steps.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_size.min(64)),
            redo_stack: Vec::new(),
            max_size,
            coalesce_threshold: Duration::from_millis(300),
        }
    }

    /// Sets the window inside which repeated typing merges into one step.
    pub fn with_coalesce_threshold(mut self, threshold: Duration) -> Self {
        self.coalesce_threshold = threshold;
        self
    }

    /// Records that a change of `kind` is about to replace `before`.
    ///
    /// Clears the redo stack.
    pub fn record(&mut self, before: &EditorState, kind: ChangeKind) {
        self.redo_stack.clear();

        if let Some(last) = self.undo_stack.back_mut() {
            let recent = last
                .timestamp
                .is_some_and(|t| t.elapsed() < self.coalesce_threshold);
            if recent && last.kind == kind && kind.coalesces() {
                last.timestamp = Some(Instant::now());
                return;
            }
        }

        self.undo_stack.push_back(Entry {
            before: before.clone(),
            kind,
            timestamp: Some(Instant::now()),
        });
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Steps back. Returns the state to restore, remembering `current` for redo.
    pub fn undo(&mut self, current: &EditorState) -> Option<EditorState> {
        let entry = self.undo_stack.pop_back()?;
        self.redo_stack.push(Entry {
            before: current.clone(),
            kind: entry.kind,
            timestamp: None,
        });
        Some(entry.before)
    }

    /// Steps forward again after an undo.
    pub fn redo(&mut self, current: &EditorState) -> Option<EditorState> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push_back(Entry {
            before: current.clone(),
            kind: entry.kind,
            timestamp: None,
        });
        Some(entry.before)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}
