//! Per-store automation lifecycle state machine.
//!
//! ```text
//! Idle --dispatch_requested--> Dispatching --ack(true)--> Launched
//!                                          --ack(false)-> Failed
//! Launched --stop_requested--> Idle
//! Failed   --reset----------> Idle
//! any      --full_reset-----> Idle
//! ```
//!
//! `dispatch_requested` from any state other than `Idle` returns `None`
//! (silent rejection) — this is what enforces at most one concurrent
//! automation per store. Callers decide whether a rejection is worth a log
//! line. No state is terminal except by explicit user action: a failed store
//! can always be reset and retried.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of one store's automation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationStatus {
    /// Waiting; eligible for dispatch.
    #[default]
    Idle,
    /// A launch request has been issued, no backend response yet.
    Dispatching,
    /// The backend acknowledged the launch; the session is running.
    Launched,
    /// The backend reported failure or was unreachable.
    Failed,
}

impl AutomationStatus {
    /// `dispatch_requested` transition. `None` unless currently `Idle`.
    #[must_use]
    pub fn dispatch_requested(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Dispatching),
            _ => None,
        }
    }

    /// Backend acknowledgement. `None` unless currently `Dispatching`.
    #[must_use]
    pub fn backend_ack(self, success: bool) -> Option<Self> {
        match self {
            Self::Dispatching if success => Some(Self::Launched),
            Self::Dispatching => Some(Self::Failed),
            _ => None,
        }
    }

    /// `stop_requested` transition. `None` unless currently `Launched`.
    #[must_use]
    pub fn stop_requested(self) -> Option<Self> {
        match self {
            Self::Launched => Some(Self::Idle),
            _ => None,
        }
    }

    /// `reset` transition. `None` unless currently `Failed`.
    #[must_use]
    pub fn reset(self) -> Option<Self> {
        match self {
            Self::Failed => Some(Self::Idle),
            _ => None,
        }
    }

    /// Force back to `Idle` from any state, bypassing preconditions.
    /// Used by the system-wide reset.
    #[must_use]
    pub fn full_reset(self) -> Self {
        Self::Idle
    }

    /// Whether an automation is in flight or running.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Dispatching | Self::Launched)
    }
}

impl fmt::Display for AutomationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Dispatching => "dispatching",
            Self::Launched => "launched",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_idle_by_default() {
        assert_eq!(AutomationStatus::default(), AutomationStatus::Idle);
    }

    #[test]
    fn should_move_to_dispatching_from_idle() {
        assert_eq!(
            AutomationStatus::Idle.dispatch_requested(),
            Some(AutomationStatus::Dispatching)
        );
    }

    #[test]
    fn should_reject_dispatch_from_every_non_idle_state() {
        for status in [
            AutomationStatus::Dispatching,
            AutomationStatus::Launched,
            AutomationStatus::Failed,
        ] {
            assert_eq!(status.dispatch_requested(), None, "from {status}");
        }
    }

    #[test]
    fn should_resolve_dispatching_on_backend_ack() {
        assert_eq!(
            AutomationStatus::Dispatching.backend_ack(true),
            Some(AutomationStatus::Launched)
        );
        assert_eq!(
            AutomationStatus::Dispatching.backend_ack(false),
            Some(AutomationStatus::Failed)
        );
    }

    #[test]
    fn should_ignore_late_ack_when_not_dispatching() {
        assert_eq!(AutomationStatus::Idle.backend_ack(true), None);
        assert_eq!(AutomationStatus::Launched.backend_ack(false), None);
    }

    #[test]
    fn should_stop_only_from_launched() {
        assert_eq!(
            AutomationStatus::Launched.stop_requested(),
            Some(AutomationStatus::Idle)
        );
        assert_eq!(AutomationStatus::Idle.stop_requested(), None);
        assert_eq!(AutomationStatus::Failed.stop_requested(), None);
    }

    #[test]
    fn should_reset_only_from_failed() {
        assert_eq!(
            AutomationStatus::Failed.reset(),
            Some(AutomationStatus::Idle)
        );
        assert_eq!(AutomationStatus::Launched.reset(), None);
    }

    #[test]
    fn should_full_reset_from_any_state() {
        for status in [
            AutomationStatus::Idle,
            AutomationStatus::Dispatching,
            AutomationStatus::Launched,
            AutomationStatus::Failed,
        ] {
            assert_eq!(status.full_reset(), AutomationStatus::Idle);
        }
    }

    #[test]
    fn should_report_active_states() {
        assert!(AutomationStatus::Dispatching.is_active());
        assert!(AutomationStatus::Launched.is_active());
        assert!(!AutomationStatus::Idle.is_active());
        assert!(!AutomationStatus::Failed.is_active());
    }

    #[test]
    fn should_serialize_in_snake_case() {
        let json = serde_json::to_string(&AutomationStatus::Dispatching).unwrap();
        assert_eq!(json, "\"dispatching\"");
    }
}
