//! Transient notification popup.
//!
//! At most one message is visible. Showing a new message replaces the old
//! one and cancels the old expiry timer, so a stale timer can never hide a
//! newer message early. Each message also carries a generation number and a
//! deadline: expiry only clears the generation it was scheduled for, and
//! [`Popup::current`] hides a message past its deadline even when no tokio
//! runtime is driving the timer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::event::{EditorEvent, EventBus};

/// Default display time.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug)]
struct Shown {
    message: String,
    generation: u64,
    deadline: Instant,
}

#[derive(Debug, Default)]
struct Slot {
    shown: Option<Shown>,
    generation: u64,
}

/// Holds the currently displayed notification.
#[derive(Debug)]
pub struct Popup {
    slot: Arc<Mutex<Slot>>,
    duration: Duration,
    pending: Option<JoinHandle<()>>,
    events: EventBus,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Popup {
    pub fn new(duration: Duration, events: EventBus) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            duration,
            pending: None,
            events,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Shows `message`, replacing any visible one. Returns its generation.
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        let message = message.into();
        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.shown = Some(Shown {
                message: message.clone(),
                generation: slot.generation,
                deadline: Instant::now() + self.duration,
            });
            slot.generation
        };

        if let Some(previous) = self.pending.take() {
            previous.abort();
        }
        self.pending = self.schedule_expiry(generation);

        tracing::debug!(generation, "notification: {}", message);
        self.events.emit(EditorEvent::NotificationShown(message));
        generation
    }

    /// Spawns the expiry timer on the current tokio runtime, if there is one.
    fn schedule_expiry(&self, generation: u64) -> Option<JoinHandle<()>> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let slot = Arc::clone(&self.slot);
        let events = self.events.clone();
        let duration = self.duration;
        Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            let expired = {
                let mut slot = lock(&slot);
                let current = slot
                    .shown
                    .as_ref()
                    .is_some_and(|s| s.generation == generation);
                if current {
                    slot.shown = None;
                }
                current
            };
            if expired {
                events.emit(EditorEvent::NotificationExpired(generation));
            }
        }))
    }

    /// The visible message, if any.
    pub fn current(&self) -> Option<String> {
        let slot = lock(&self.slot);
        slot.shown
            .as_ref()
            .filter(|s| Instant::now() < s.deadline)
            .map(|s| s.message.clone())
    }

    pub fn is_visible(&self) -> bool {
        self.current().is_some()
    }

    /// Hides the message now and cancels its timer.
    pub fn dismiss(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        lock(&self.slot).shown = None;
    }
}

impl Drop for Popup {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
