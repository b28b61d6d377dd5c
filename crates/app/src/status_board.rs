//! Status board — the per-store lifecycle table.
//!
//! All state transitions funnel through this one component, which applies
//! the [`AutomationStatus`] transition rules and drops anything the state
//! machine rejects. Stores the board has never seen are `Idle`.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use storepilot_domain::id::StoreId;
use storepilot_domain::status::AutomationStatus;

/// Tracks the lifecycle state of every store.
#[derive(Debug, Default)]
pub struct StatusBoard {
    statuses: Mutex<HashMap<StoreId, AutomationStatus>>,
}

impl StatusBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status of a store. Unknown stores are `Idle`.
    #[must_use]
    pub fn status_of(&self, id: &StoreId) -> AutomationStatus {
        self.lock().get(id).copied().unwrap_or_default()
    }

    /// Apply `dispatch_requested`. Returns whether the transition was
    /// accepted — `false` means the store already has an automation in
    /// flight and the caller must not launch another.
    pub fn begin_dispatch(&self, id: &StoreId) -> bool {
        let mut statuses = self.lock();
        let current = statuses.get(id).copied().unwrap_or_default();
        match current.dispatch_requested() {
            Some(next) => {
                statuses.insert(id.clone(), next);
                true
            }
            None => false,
        }
    }

    /// Apply a backend acknowledgement. A late ack for a store that is no
    /// longer `Dispatching` (stopped or reset meanwhile) is dropped.
    pub fn acknowledge(&self, id: &StoreId, success: bool) -> Option<AutomationStatus> {
        let mut statuses = self.lock();
        let current = statuses.get(id).copied().unwrap_or_default();
        let next = current.backend_ack(success)?;
        statuses.insert(id.clone(), next);
        Some(next)
    }

    /// Force a store back to `Idle` regardless of its current state.
    pub fn force_idle(&self, id: &StoreId) {
        let mut statuses = self.lock();
        let current = statuses.get(id).copied().unwrap_or_default();
        statuses.insert(id.clone(), current.full_reset());
    }

    /// Force every known store back to `Idle`.
    pub fn reset_all(&self) {
        let mut statuses = self.lock();
        for status in statuses.values_mut() {
            *status = status.full_reset();
        }
    }

    /// Snapshot of every known store's status.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<StoreId, AutomationStatus> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StoreId, AutomationStatus>> {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
