//! Fan-out bus for engine events.
//!
//! Thin wrapper over a tokio [`broadcast`] channel: the engine publishes,
//! the SSE endpoint and tests subscribe. A slow subscriber misses old
//! events instead of blocking the engine.

use std::future::Future;

use tokio::sync::broadcast;

use lumen_domain::error::LumenError;
use lumen_domain::event::Event;

use crate::ports::EventPublisher;

/// In-process implementation of [`EventPublisher`].
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a bus whose channel retains up to `capacity` undelivered
    /// events per subscriber before the oldest are discarded.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Open a new subscription.
    ///
    /// The receiver sees only events published after this call; nothing
    /// is replayed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), LumenError>> + Send {
        // A send error only means nobody is subscribed right now.
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}
