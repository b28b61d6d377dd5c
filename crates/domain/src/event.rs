//! Event — an immutable record of something that happened.
//!
//! Events are produced as dispatches start, resolve, or are skipped, and
//! when the system is reset. The caller-facing layer (out of scope here)
//! subscribes to these instead of polling.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, StoreId};
use crate::time::{Timestamp, now};

/// Kind of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A fresh schedule was loaded from the configuration source.
    ScheduleLoaded,
    /// A launch request was issued to the backend.
    DispatchStarted,
    /// A dispatch was requested but the store was already active.
    DispatchSkipped,
    /// The backend acknowledged a launch.
    LaunchSucceeded,
    /// The backend reported failure or was unreachable.
    LaunchFailed,
    /// A stop signal was sent for a store.
    StopRequested,
    /// Every store was forced back to idle and the selection cleared.
    FullReset,
}

/// A single lifecycle record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub store_id: Option<StoreId>,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, store_id: Option<StoreId>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            store_id,
            data,
            timestamp: now(),
        }
    }
}
