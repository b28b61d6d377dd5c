//! Launch wire values and dispatch policy helpers.
//!
//! [`LaunchConfig`] is the payload handed to the automation backend;
//! [`LaunchOutcome`] is its tagged result. The backend's answers are never
//! inspected structurally beyond `{success, message}`.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::datetime::format_wire;
use crate::id::StoreId;
use crate::schedule::ScheduleEntry;
use crate::time::Timestamp;

/// How a dispatch was initiated. Carried through logs and events so
/// automatic fires can be told apart from user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOrigin {
    Manual,
    Automatic,
}

impl DispatchOrigin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automatic => "automatic",
        }
    }
}

/// Payload for a single launch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub store_id: StoreId,
    pub display_name: String,
    /// Canonical `YYYY-MM-DDTHH:mm:ss` start instant, or `None` to start
    /// immediately. Batch dispatch always clears this.
    pub target_instant: Option<String>,
    pub visit_date: String,
    pub visit_time: String,
    pub carrier: String,
    pub email: String,
    /// Offset-corrected client time at the moment of dispatch. `None` on
    /// batch dispatch, where no time comparison is wanted.
    pub client_time: Option<String>,
}

impl LaunchConfig {
    /// Build the payload for a scheduled (single) dispatch.
    #[must_use]
    pub fn for_single(entry: &ScheduleEntry, client_time: Timestamp) -> Self {
        Self {
            store_id: entry.store_id.clone(),
            display_name: entry.display_name.clone(),
            target_instant: entry.target_instant.map(format_wire),
            visit_date: entry.visit_date.clone(),
            visit_time: entry.visit_time.clone(),
            carrier: entry.carrier.clone(),
            email: entry.identity_email.clone(),
            client_time: Some(format_wire(client_time)),
        }
    }

    /// Build the payload for a batch dispatch: the target instant is
    /// cleared so every member starts immediately.
    #[must_use]
    pub fn for_batch(entry: &ScheduleEntry) -> Self {
        Self {
            store_id: entry.store_id.clone(),
            display_name: entry.display_name.clone(),
            target_instant: None,
            visit_date: entry.visit_date.clone(),
            visit_time: entry.visit_time.clone(),
            carrier: entry.carrier.clone(),
            email: entry.identity_email.clone(),
            client_time: None,
        }
    }
}

/// Tagged result of a launch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchOutcome {
    pub success: bool,
    pub message: String,
}

impl LaunchOutcome {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Backend response to a stop request. Best-effort: the external session
/// may keep running even when acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopAck {
    pub acknowledged: bool,
}

/// How far ahead of the target a manual dispatch may run without asking
/// the user first.
const CONFIRMATION_LEAD_SECS: i64 = 60;

/// Whether a manual dispatch at `now` needs explicit user confirmation.
///
/// True when the configured target is more than a minute away — a human
/// should not unknowingly open a session far ahead of its intended window.
/// Automatic dispatch never consults this. The confirmation I/O itself is
/// the presentation layer's problem; this is only the decision.
#[must_use]
pub fn requires_confirmation(now: Timestamp, target: Option<Timestamp>) -> bool {
    target.is_some_and(|target| target - now > Duration::seconds(CONFIRMATION_LEAD_SECS))
}
