//! Event bus port — publish/subscribe for engine events.

use std::future::Future;

use lumen_domain::error::LumenError;
use lumen_domain::event::Event;

/// Publishes engine events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), LumenError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), LumenError>> + Send {
        (**self).publish(event)
    }
}
