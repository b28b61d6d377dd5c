//! Dispatch coordinator — manual and automatic launch orchestration.
//!
//! Owns the status board and the manual selection set, talks to the
//! automation backend through its port, and publishes lifecycle events.
//! Transport failures are folded into failed outcomes at this boundary so
//! callers only ever see the `{success, message}` shape.

use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use storepilot_domain::event::{Event, EventType};
use storepilot_domain::id::StoreId;
use storepilot_domain::launch::{
    DispatchOrigin, LaunchConfig, LaunchOutcome, StopAck, requires_confirmation,
};
use storepilot_domain::schedule::ScheduleEntry;
use storepilot_domain::selection::SelectionSet;
use storepilot_domain::status::AutomationStatus;
use storepilot_domain::time::{Clock, Timestamp};

use crate::ports::{AutomationBackend, EventPublisher};
use crate::status_board::StatusBoard;

/// Result of a single-store dispatch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleDispatch {
    /// The target is more than a minute away and the caller has not yet
    /// confirmed the early start. Nothing was changed or launched.
    ConfirmationRequired { target: Timestamp },
    /// The store already has an automation in flight; nothing was launched.
    Skipped,
    /// The launch ran and resolved to this outcome.
    Done(LaunchOutcome),
}

/// Result of a batch dispatch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchDispatch {
    /// No stores were selected; nothing was launched.
    EmptySelection,
    /// Per-store results, one per dispatched member.
    Done(Vec<BatchItem>),
}

/// One member's result within a batch dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub store_id: StoreId,
    pub outcome: LaunchOutcome,
}

/// Orchestrates launches, stops, and resets across all stores.
pub struct DispatchCoordinator<B, P> {
    backend: B,
    publisher: P,
    board: StatusBoard,
    selection: Mutex<SelectionSet>,
    clock: Clock,
}

impl<B, P> DispatchCoordinator<B, P>
where
    B: AutomationBackend,
    P: EventPublisher + Send + Sync,
{
    #[must_use]
    pub fn new(backend: B, publisher: P, clock: Clock) -> Self {
        Self {
            backend,
            publisher,
            board: StatusBoard::new(),
            selection: Mutex::new(SelectionSet::new()),
            clock,
        }
    }

    #[must_use]
    pub fn board(&self) -> &StatusBoard {
        &self.board
    }

    #[must_use]
    pub fn status_of(&self, id: &StoreId) -> AutomationStatus {
        self.board.status_of(id)
    }

    /// Dispatch one store.
    ///
    /// A manual dispatch whose target is more than a minute in the future
    /// returns [`SingleDispatch::ConfirmationRequired`] before any state
    /// change or backend call; the caller re-invokes with `confirmed` once
    /// the user agrees. Automatic dispatches never ask.
    pub async fn dispatch_single(
        &self,
        entry: &ScheduleEntry,
        origin: DispatchOrigin,
        confirmed: bool,
    ) -> SingleDispatch {
        let now = self.clock.now();
        if origin == DispatchOrigin::Manual
            && !confirmed
            && requires_confirmation(now, entry.target_instant)
        {
            // Safe to return here: nothing has been touched yet.
            return SingleDispatch::ConfirmationRequired {
                target: entry.target_instant.unwrap_or(now),
            };
        }

        if !self.board.begin_dispatch(&entry.store_id) {
            warn!(
                store = %entry.store_id,
                origin = origin.as_str(),
                "dispatch skipped, automation already in flight"
            );
            self.publish(Event::new(
                EventType::DispatchSkipped,
                Some(entry.store_id.clone()),
                serde_json::json!({ "origin": origin.as_str() }),
            ))
            .await;
            return SingleDispatch::Skipped;
        }

        info!(
            store = %entry.store_id,
            origin = origin.as_str(),
            "dispatching automation"
        );
        self.publish(Event::new(
            EventType::DispatchStarted,
            Some(entry.store_id.clone()),
            serde_json::json!({ "origin": origin.as_str() }),
        ))
        .await;

        let config = LaunchConfig::for_single(entry, now);
        let outcome = match self.backend.launch(config).await {
            Ok(outcome) => outcome,
            Err(err) => LaunchOutcome::failure(err.to_string()),
        };
        self.reconcile(&entry.store_id, origin, &outcome).await;
        SingleDispatch::Done(outcome)
    }

    /// Dispatch several stores at once.
    ///
    /// Every eligible member is marked `Dispatching` up front, then all
    /// launches are started together. Members that already have an
    /// automation in flight are skipped without blocking their siblings.
    pub async fn dispatch_batch(&self, entries: &[ScheduleEntry]) -> BatchDispatch {
        if entries.is_empty() {
            return BatchDispatch::EmptySelection;
        }

        let mut members = Vec::with_capacity(entries.len());
        for entry in entries {
            if self.board.begin_dispatch(&entry.store_id) {
                members.push(entry);
            } else {
                warn!(store = %entry.store_id, "batch member skipped, automation already in flight");
                self.publish(Event::new(
                    EventType::DispatchSkipped,
                    Some(entry.store_id.clone()),
                    serde_json::json!({ "origin": DispatchOrigin::Manual.as_str() }),
                ))
                .await;
            }
        }

        for entry in &members {
            self.publish(Event::new(
                EventType::DispatchStarted,
                Some(entry.store_id.clone()),
                serde_json::json!({ "origin": DispatchOrigin::Manual.as_str() }),
            ))
            .await;
        }

        info!(count = members.len(), "dispatching batch");
        let configs = members.iter().map(|e| LaunchConfig::for_batch(e)).collect();
        let outcomes = self.backend.launch_batch(configs).await;

        let mut items = Vec::with_capacity(members.len());
        for (index, entry) in members.iter().enumerate() {
            let outcome = outcomes
                .get(index)
                .cloned()
                .unwrap_or_else(|| LaunchOutcome::failure("missing batch response"));
            self.reconcile(&entry.store_id, DispatchOrigin::Manual, &outcome)
                .await;
            items.push(BatchItem {
                store_id: entry.store_id.clone(),
                outcome,
            });
        }
        BatchDispatch::Done(items)
    }

    /// Dispatch the currently selected stores, resolving the selection
    /// against the given entry list. The selection survives the dispatch.
    pub async fn dispatch_selected(&self, all_entries: &[ScheduleEntry]) -> BatchDispatch {
        let selected: Vec<ScheduleEntry> = {
            let selection = self.lock_selection();
            all_entries
                .iter()
                .filter(|entry| selection.contains(&entry.store_id))
                .cloned()
                .collect()
        };
        self.dispatch_batch(&selected).await
    }

    /// Ask the backend to stop a store's session, then force the store back
    /// to `Idle` regardless of the answer. The external session may keep
    /// running; the scheduler's bookkeeping does not wait on it.
    pub async fn stop(&self, store_id: &StoreId) -> StopAck {
        let ack = match self.backend.stop(store_id).await {
            Ok(ack) => ack,
            Err(err) => {
                warn!(store = %store_id, error = %err, "stop request failed");
                StopAck {
                    acknowledged: false,
                }
            }
        };
        self.board.force_idle(store_id);
        self.publish(Event::new(
            EventType::StopRequested,
            Some(store_id.clone()),
            serde_json::json!({ "acknowledged": ack.acknowledged }),
        ))
        .await;
        ack
    }

    /// Reset every store to `Idle` and clear the selection. Running external
    /// sessions are not touched.
    pub async fn reset_all(&self) {
        self.board.reset_all();
        self.lock_selection().clear();
        info!("all statuses reset");
        self.publish(Event::new(
            EventType::FullReset,
            None,
            serde_json::json!({}),
        ))
        .await;
    }

    /// Flip a store's selection membership. Stores with an automation in
    /// flight cannot be added; returns whether the store is selected after
    /// the call.
    pub fn toggle_selection(&self, id: &StoreId) -> bool {
        let mut selection = self.lock_selection();
        if !selection.contains(id) && self.board.status_of(id).is_active() {
            return false;
        }
        selection.toggle(id)
    }

    /// Replace the selection with every eligible store in `entries`.
    pub fn select_all(&self, entries: &[ScheduleEntry]) {
        let eligible: Vec<&StoreId> = entries
            .iter()
            .map(|entry| &entry.store_id)
            .filter(|id| !self.board.status_of(id).is_active())
            .collect();
        self.lock_selection().select_all(eligible);
    }

    pub fn clear_selection(&self) {
        self.lock_selection().clear();
    }

    #[must_use]
    pub fn is_selected(&self, id: &StoreId) -> bool {
        self.lock_selection().contains(id)
    }

    /// Snapshot of the selected store ids.
    #[must_use]
    pub fn selected(&self) -> Vec<StoreId> {
        self.lock_selection().ids()
    }

    async fn reconcile(&self, store_id: &StoreId, origin: DispatchOrigin, outcome: &LaunchOutcome) {
        let next = self.board.acknowledge(store_id, outcome.success);
        if next.is_none() {
            // Stopped or reset while the launch was in flight.
            warn!(store = %store_id, "late launch outcome dropped");
            return;
        }
        let event_type = if outcome.success {
            info!(store = %store_id, message = %outcome.message, "automation launched");
            EventType::LaunchSucceeded
        } else {
            warn!(store = %store_id, message = %outcome.message, "automation launch failed");
            EventType::LaunchFailed
        };
        self.publish(Event::new(
            event_type,
            Some(store_id.clone()),
            serde_json::json!({
                "origin": origin.as_str(),
                "message": outcome.message,
            }),
        ))
        .await;
    }

    async fn publish(&self, event: Event) {
        // Event delivery is best-effort; a full or closed bus never blocks
        // the dispatch path.
        let _ = self.publisher.publish(event).await;
    }

    fn lock_selection(&self) -> std::sync::MutexGuard<'_, SelectionSet> {
        self.selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
