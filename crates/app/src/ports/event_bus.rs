//! Event bus port — publish/subscribe for lifecycle events.

use std::future::Future;

use storepilot_domain::error::StorePilotError;
use storepilot_domain::event::Event;

/// Publishes lifecycle events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), StorePilotError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), StorePilotError>> + Send {
        (**self).publish(event)
    }
}
