//! # Marktype Core
//!
//! Editing behaviour on top of the `marktype-doc` model.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                        Editor                         │
//! │  ┌────────────┐ ┌────────────┐ ┌────────────────────┐ │
//! │  │  Shortcut  │ │  History   │ │   DocumentStore    │ │
//! │  │   engine   │ │ (undo/redo)│ │  (KeyValueStore)   │ │
//! │  └────────────┘ └────────────┘ └────────────────────┘ │
//! │  ┌────────────┐ ┌────────────┐ ┌────────────────────┐ │
//! │  │   Popup    │ │  EventBus  │ │  Config / StyleMap │ │
//! │  └────────────┘ └────────────┘ └────────────────────┘ │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! Each concern lives in its own module and `pub use` re-exports the types
//! callers need, so `marktype_core::Editor` works without knowing the layout.

pub mod command;
pub mod config;
pub mod editor;
pub mod event;
pub mod notify;
pub mod shortcut;
pub mod storage;
pub mod style_map;
pub mod styles;

pub use command::Command;
pub use config::{Config, ConfigError};
pub use editor::Editor;
pub use event::{EditorEvent, EventBus, EventHandler};
pub use notify::Popup;
pub use shortcut::{evaluate, shortcut_guide, Outcome, ShortcutKind, Transition, TriggerRule};
pub use storage::{DocumentStore, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use style_map::{Color, StyleMap, Treatment};
pub use styles::{describe_active_styles, ActiveStyles};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Document error: {0}")]
    Doc(#[from] marktype_doc::DocError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use marktype_doc::DocError;

    #[test]
    fn test_errors_convert() {
        let err: CoreError = DocError::EmptyDocument.into();
        assert!(matches!(err, CoreError::Doc(_)));
        assert!(err.to_string().starts_with("Document error"));

        let err: CoreError = StorageError::InvalidKey("a/b".into()).into();
        assert!(matches!(err, CoreError::Storage(_)));
    }
}
