//! Document persistence over a flat key-value store.
//!
//! ## Format
//!
//! The whole document is stored as one JSON value under a single key:
//!
//! ```json
//! {"version":1,"blocks":[{"id":"…","type":"header-one","text":"Hi","styles":[]}]}
//! ```
//!
//! Loading never fails: absent, unreadable or corrupt content is reported as
//! "nothing saved" and the caller starts from an empty document.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use marktype_doc::{Block, Document};

/// Current persisted format version.
pub const FORMAT_VERSION: u32 = 1;

/// Key the document is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "editorContent";

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A flat string-to-string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Uses `root` as the storage directory; it is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root)?;
        // Write then rename so a crash never leaves half a document behind.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct StoredRef<'a> {
    version: u32,
    blocks: &'a [Block],
}

#[derive(Deserialize)]
struct Stored {
    version: u32,
    blocks: Vec<Block>,
}

/// Saves and restores a [`Document`] under one key of a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct DocumentStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> DocumentStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Serializes `document`, fully overwriting the stored value.
    pub fn save(&mut self, document: &Document) -> Result<(), StorageError> {
        let json = encode(document)?;
        self.store.set(&self.key, &json)?;
        tracing::info!(key = %self.key, blocks = document.len(), "document saved");
        Ok(())
    }

    /// Reads the saved document, if a valid one exists.
    pub fn load(&self) -> Option<Document> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no saved document");
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read saved document: {}", e);
                return None;
            }
        };
        match decode(&raw) {
            Some(document) => {
                tracing::info!(key = %self.key, blocks = document.len(), "document restored");
                Some(document)
            }
            None => None,
        }
    }

    /// Reads the saved document, falling back to an empty one.
    pub fn load_or_default(&self) -> Document {
        self.load().unwrap_or_default()
    }
}

/// Serializes a document to the persisted JSON form.
pub fn encode(document: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StoredRef {
        version: FORMAT_VERSION,
        blocks: document.blocks(),
    })
}

/// Parses the persisted JSON form; `None` for anything unusable.
pub fn decode(raw: &str) -> Option<Document> {
    let stored: Stored = match serde_json::from_str(raw) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("Saved document is corrupt: {}", e);
            return None;
        }
    };
    if stored.version != FORMAT_VERSION {
        tracing::warn!("Saved document has unsupported version {}", stored.version);
        return None;
    }
    match Document::from_blocks(stored.blocks) {
        Ok(document) => Some(document),
        Err(e) => {
            tracing::warn!("Saved document is invalid: {}", e);
            None
        }
    }
}
