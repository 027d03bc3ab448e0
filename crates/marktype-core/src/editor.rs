//! Main editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` acts as a facade over the immutable document model, the
//! shortcut engine, undo history, persistence and notifications. Callers
//! feed it keystrokes and commands; it swaps in new [`EditorState`]
//! snapshots and announces what happened on the [`EventBus`].

use marktype_doc::{BlockType, ChangeKind, EditorState, History, Selection, StyleTag};

use crate::command::Command;
use crate::config::Config;
use crate::event::{EditorEvent, EventBus};
use crate::notify::Popup;
use crate::shortcut::{self, Outcome, ShortcutKind, Transition};
use crate::storage::{DocumentStore, KeyValueStore};
use crate::style_map::StyleMap;
use crate::styles::ActiveStyles;
use crate::CoreResult;

/// Message shown after a successful save.
pub const SAVED_MESSAGE: &str = "Content Saved";

/// The main editor state.
///
/// ## Thread Safety
///
/// `Editor` is owned by a single thread. The only background work is the
/// popup expiry timer, which shares nothing but the popup slot.
pub struct Editor<S: KeyValueStore> {
    /// Current snapshot
    state: EditorState,

    /// Undo/redo stacks
    history: History,

    /// Transient notification
    popup: Popup,

    /// Where the document is saved
    store: DocumentStore<S>,

    /// Editor configuration
    config: Config,

    /// Presentation treatments
    style_map: StyleMap,

    /// Event bus for notifications
    event_bus: EventBus,
}

impl<S: KeyValueStore> Editor<S> {
    /// Creates an editor over `store`, restoring the saved document if any.
    pub fn open(store: S, config: Config) -> Self {
        let event_bus = EventBus::new();
        let store = DocumentStore::new(store, config.storage.key.clone());
        let state = EditorState::with_document(store.load_or_default());
        Self {
            state,
            history: Self::history_for(&config),
            popup: Popup::new(config.notifications.duration(), event_bus.clone()),
            store,
            config,
            style_map: StyleMap::default(),
            event_bus,
        }
    }

    fn history_for(config: &Config) -> History {
        History::new(config.history.undo_limit)
            .with_coalesce_threshold(config.history.coalesce_threshold())
    }

    /// Re-reads the saved document, discarding the current one and its history.
    ///
    /// Returns true if saved content was restored.
    pub fn reload(&mut self) -> bool {
        let loaded = self.store.load();
        let restored = loaded.is_some();
        self.state = EditorState::with_document(loaded.unwrap_or_default());
        self.history.clear();
        self.emit(EditorEvent::DocumentLoaded { restored });
        restored
    }

    // ==================== Typing ====================

    /// Handles one typed character.
    ///
    /// The shortcut engine runs first; when a rule fires, the character is
    /// not inserted and the rule's name is shown. A newline splits the block.
    /// Returns the shortcut that fired, if any.
    pub fn handle_char(&mut self, ch: char) -> CoreResult<Option<ShortcutKind>> {
        if ch == '\n' {
            self.insert_newline()?;
            return Ok(None);
        }

        match shortcut::evaluate(&self.state, ch) {
            Outcome::Handled(Transition { state, rule }) => {
                self.commit(state, ChangeKind::ShortcutRewrite);
                self.popup.show(rule.name());
                self.emit(EditorEvent::ShortcutFired(rule));
                Ok(Some(rule))
            }
            Outcome::PassThrough => {
                let mut buf = [0; 4];
                let next = self.state.insert_text(ch.encode_utf8(&mut buf))?;
                self.commit(next, ChangeKind::InsertCharacters);
                Ok(None)
            }
        }
    }

    /// Types `text` one character at a time, shortcuts included.
    pub fn type_text(&mut self, text: &str) -> CoreResult<Vec<ShortcutKind>> {
        let mut fired = Vec::new();
        for ch in text.chars() {
            if let Some(kind) = self.handle_char(ch)? {
                fired.push(kind);
            }
        }
        Ok(fired)
    }

    /// Enter.
    pub fn insert_newline(&mut self) -> CoreResult<()> {
        let next = self.state.split_block()?;
        self.commit(next, ChangeKind::SplitBlock);
        Ok(())
    }

    /// Backspace.
    pub fn delete_backward(&mut self) -> CoreResult<()> {
        let next = self.state.delete_backward()?;
        if next != self.state {
            self.commit(next, ChangeKind::Backspace);
        }
        Ok(())
    }

    // ==================== Formatting ====================

    pub fn toggle_inline_style(&mut self, tag: StyleTag) -> CoreResult<()> {
        let next = self.state.toggle_inline_style(tag)?;
        self.commit(next, ChangeKind::ChangeInlineStyle);
        Ok(())
    }

    pub fn toggle_block_type(&mut self, block_type: BlockType) -> CoreResult<()> {
        let next = self.state.toggle_block_type(block_type);
        self.commit(next, ChangeKind::ChangeBlockType);
        Ok(())
    }

    // ==================== Selection ====================

    /// Moves the selection; the document is unchanged.
    pub fn set_selection(&mut self, selection: Selection) -> CoreResult<()> {
        self.state = self.state.with_selection(selection)?;
        self.emit(EditorEvent::SelectionChanged);
        Ok(())
    }

    /// Puts the caret at the end of the document.
    pub fn move_to_end(&mut self) -> CoreResult<()> {
        self.set_selection(Selection::caret(self.state.document().end()))
    }

    // ==================== History ====================

    /// Returns true if there was something to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.state) {
            Some(previous) => {
                self.state = previous;
                self.log_history("undo");
                self.emit(EditorEvent::DocumentChanged);
                true
            }
            None => false,
        }
    }

    /// Returns true if there was something to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.state) {
            Some(next) => {
                self.state = next;
                self.log_history("redo");
                self.emit(EditorEvent::DocumentChanged);
                true
            }
            None => false,
        }
    }

    fn log_history(&self, action: &str) {
        tracing::debug!(
            undo = self.history.undo_count(),
            redo = self.history.redo_count(),
            "{}",
            action
        );
    }

    // ==================== Storage ====================

    /// Writes the document to storage and shows a confirmation.
    pub fn save(&mut self) -> CoreResult<()> {
        self.store.save(self.state.document())?;
        self.popup.show(SAVED_MESSAGE);
        self.emit(EditorEvent::DocumentSaved);
        Ok(())
    }

    // ==================== Commands ====================

    /// Runs a command.
    pub fn execute(&mut self, command: &Command) -> CoreResult<()> {
        tracing::trace!(command = command.display_name(), "execute");
        match command {
            Command::InsertText(text) => self.type_text(text).map(|_| ()),
            Command::InsertNewline => self.insert_newline(),
            Command::DeleteBackward => self.delete_backward(),
            Command::ToggleInlineStyle(tag) => self.toggle_inline_style(*tag),
            Command::ToggleBlockType(block_type) => self.toggle_block_type(*block_type),
            Command::Undo => {
                self.undo();
                Ok(())
            }
            Command::Redo => {
                self.redo();
                Ok(())
            }
            Command::Save => self.save(),
            Command::DismissNotification => {
                self.popup.dismiss();
                Ok(())
            }
        }
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Styles in effect at the selection.
    pub fn active_styles(&self) -> ActiveStyles {
        ActiveStyles::of(&self.state)
    }

    /// The visible notification, if any.
    pub fn notification(&self) -> Option<String> {
        self.popup.current()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Applies new settings. The storage key and undo limit apply from the
    /// next [`Editor::open`]; the popup duration applies immediately.
    pub fn set_config(&mut self, config: Config) {
        self.popup = Popup::new(config.notifications.duration(), self.event_bus.clone());
        self.config = config;
        self.emit(EditorEvent::ConfigChanged);
    }

    pub fn style_map(&self) -> &StyleMap {
        &self.style_map
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn store(&self) -> &DocumentStore<S> {
        &self.store
    }

    /// Consumes the editor, handing back its store.
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    // ==================== Events ====================

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }

    /// Records `self.state` for undo and replaces it with `next`.
    fn commit(&mut self, next: EditorState, kind: ChangeKind) {
        self.history.record(&self.state, kind);
        self.state = next;
        self.emit(EditorEvent::DocumentChanged);
    }
}
