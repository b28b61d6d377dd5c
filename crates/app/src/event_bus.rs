//! Broadcast bus for dispatch lifecycle events.
//!
//! The coordinator and monitor publish every status change here; the
//! daemon's event logger (and any future caller-facing surface) subscribes.
//! Subscribers only see events published after they join, and a bus nobody
//! listens to quietly drops what it is given — dispatching never depends on
//! an audience.

use std::future::Future;

use tokio::sync::broadcast;

use storepilot_domain::error::StorePilotError;
use storepilot_domain::event::Event;

use crate::ports::EventPublisher;

/// Channel capacity used by [`InProcessEventBus::default`]. Sized for a
/// burst of per-store events from a full batch dispatch; a subscriber that
/// falls further behind sees a lag error, not a blocked publisher.
pub const DEFAULT_CAPACITY: usize = 256;

/// In-process event bus over a tokio [`broadcast`] channel.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl Default for InProcessEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl InProcessEventBus {
    /// Create a bus holding up to `capacity` undelivered events per
    /// subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Join the bus. The receiver sees every event published from this
    /// point on; earlier events are gone.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Number of currently attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), StorePilotError>> + Send {
        // send only errors when there are zero receivers; for a broadcast
        // bus that is a normal condition, not a failure.
        let _ = self.sender.send(event);
        async { Ok(()) }
    }
}
