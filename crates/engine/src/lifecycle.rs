//! App lifecycle broadcast hub.
//!
//! [`LifecycleSignal`] carries foreground/background transitions from the
//! hosting process to the scheduler. Backed by `tokio::sync::broadcast` so
//! any number of subscribers can independently observe every transition.

use tokio::sync::broadcast;

/// A foreground/background transition of the hosting app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Foreground,
    Background,
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 16;

/// Lifecycle transition hub.
pub struct LifecycleSignal {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl LifecycleSignal {
    /// Create a signal with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a transition to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: LifecycleEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all transitions published on this signal.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}

impl Default for LifecycleSignal {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
