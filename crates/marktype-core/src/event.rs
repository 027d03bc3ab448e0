//! Event system for editor notifications.
//!
//! Events are plain values broadcast over `tokio::sync::broadcast`, so the
//! presentation layer (and tests) can observe the editor without the editor
//! holding references to them. Lagged receivers never block the sender.

use tokio::sync::broadcast;

use crate::shortcut::ShortcutKind;

/// Events that can occur in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Text, styles or block types changed
    DocumentChanged,
    /// The selection moved without changing the document
    SelectionChanged,
    /// A typing shortcut rewrote the document
    ShortcutFired(ShortcutKind),
    /// The document was written to storage
    DocumentSaved,
    /// Startup load finished; `restored` is false when starting empty
    DocumentLoaded { restored: bool },
    /// A transient notification appeared
    NotificationShown(String),
    /// The notification with this generation expired
    NotificationExpired(u64),
    /// Configuration changed
    ConfigChanged,
}

/// Event bus for broadcasting editor events.
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: EditorEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}

/// Helper for processing events asynchronously.
///
/// ```ignore
/// let mut handler = EventHandler::new(editor.subscribe());
/// while let Some(event) = handler.next().await {
///     if let EditorEvent::ShortcutFired(kind) = event {
///         println!("{kind}");
///     }
/// }
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<EditorEvent>,
}

impl EventHandler {
    pub fn new(receiver: broadcast::Receiver<EditorEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    pub async fn next(&mut self) -> Option<EditorEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns every event already queued, without waiting.
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                }
                Err(_) => return events,
            }
        }
    }
}
