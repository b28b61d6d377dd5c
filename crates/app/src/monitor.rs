//! Auto-start monitor — the shared scheduling tick.
//!
//! One periodic task scans the whole entry list instead of arming a timer
//! per store: entries whose target has been reached and whose store is
//! still idle are dispatched automatically. The entry list lives in a
//! watch channel so a settings reload swaps it atomically between ticks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use storepilot_domain::launch::DispatchOrigin;
use storepilot_domain::schedule::ScheduleEntry;
use storepilot_domain::status::AutomationStatus;
use storepilot_domain::time::Clock;

use crate::dispatcher::{DispatchCoordinator, SingleDispatch};
use crate::ports::{AutomationBackend, EventPublisher};

/// How often the monitor re-evaluates the schedule.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Writer half of the schedule: call [`replace`](Self::replace) whenever a
/// fresh entry list has been loaded. Dropping the handle stops the monitor.
pub struct ScheduleHandle {
    sender: watch::Sender<Arc<Vec<ScheduleEntry>>>,
}

impl ScheduleHandle {
    /// Swap in a new entry list. The monitor picks it up on its next tick.
    pub fn replace(&self, entries: Vec<ScheduleEntry>) {
        let _ = self.sender.send(Arc::new(entries));
    }
}

/// Periodically fires automatic dispatches for due entries.
pub struct AutoStartMonitor<B, P> {
    coordinator: Arc<DispatchCoordinator<B, P>>,
    entries: watch::Receiver<Arc<Vec<ScheduleEntry>>>,
    clock: Clock,
}

impl<B, P> AutoStartMonitor<B, P>
where
    B: AutomationBackend + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    /// Create a monitor and the handle used to feed it schedules.
    #[must_use]
    pub fn new(
        coordinator: Arc<DispatchCoordinator<B, P>>,
        clock: Clock,
    ) -> (Self, ScheduleHandle) {
        let (sender, receiver) = watch::channel(Arc::new(Vec::new()));
        (
            Self {
                coordinator,
                entries: receiver,
                clock,
            },
            ScheduleHandle { sender },
        )
    }

    /// Entries that are due right now and whose store is still idle.
    ///
    /// The idle check makes the tick idempotent: a store that fired on a
    /// previous tick is `Dispatching`, `Launched`, or `Failed`, and none of
    /// those fire again without user intervention.
    #[must_use]
    pub fn due_entries(&self) -> Vec<ScheduleEntry> {
        let now = self.clock.now();
        let snapshot = Arc::clone(&self.entries.borrow());
        snapshot
            .iter()
            .filter(|entry| {
                entry.is_due(now)
                    && self.coordinator.status_of(&entry.store_id) == AutomationStatus::Idle
            })
            .cloned()
            .collect()
    }

    /// Evaluate one tick, spawning a dispatch per due entry.
    ///
    /// Launches run concurrently and are not awaited here; a slow backend
    /// never delays the next tick. The returned handles exist for callers
    /// that want to observe completion.
    pub fn tick(&self) -> Vec<JoinHandle<SingleDispatch>> {
        let due = self.due_entries();
        if !due.is_empty() {
            debug!(count = due.len(), "due entries found");
        }
        due.into_iter()
            .map(|entry| {
                let coordinator = Arc::clone(&self.coordinator);
                tokio::spawn(async move {
                    coordinator
                        .dispatch_single(&entry, DispatchOrigin::Automatic, true)
                        .await
                })
            })
            .collect()
    }

    /// Run the tick loop until the [`ScheduleHandle`] is dropped.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(TICK_PERIOD);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if self.entries.has_changed().is_err() {
                break;
            }
            drop(self.tick());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    use chrono::Duration;

    use storepilot_domain::error::StorePilotError;
    use storepilot_domain::event::Event;
    use storepilot_domain::id::StoreId;
    use storepilot_domain::launch::{LaunchConfig, LaunchOutcome, StopAck};
    use storepilot_domain::time::Timestamp;

    use super::*;

    #[derive(Default)]
    struct CountingBackend {
        launches: Mutex<HashMap<StoreId, usize>>,
        failing: Mutex<Vec<StoreId>>,
    }

    impl CountingBackend {
        fn launch_count(&self, id: &StoreId) -> usize {
            self.launches.lock().unwrap().get(id).copied().unwrap_or(0)
        }

        fn fail_for(&self, id: &str) {
            self.failing.lock().unwrap().push(StoreId::new(id));
        }
    }

    impl AutomationBackend for CountingBackend {
        fn launch(
            &self,
            config: LaunchConfig,
        ) -> impl Future<Output = Result<LaunchOutcome, StorePilotError>> + Send {
            let mut launches = self.launches.lock().unwrap();
            *launches.entry(config.store_id.clone()).or_insert(0) += 1;
            let failed = self.failing.lock().unwrap().contains(&config.store_id);
            async move {
                if failed {
                    Ok(LaunchOutcome::failure("sold out"))
                } else {
                    Ok(LaunchOutcome::success("started"))
                }
            }
        }

        fn stop(
            &self,
            _store_id: &StoreId,
        ) -> impl Future<Output = Result<StopAck, StorePilotError>> + Send {
            async { Ok(StopAck { acknowledged: true }) }
        }
    }

    struct NullPublisher;

    impl EventPublisher for NullPublisher {
        fn publish(
            &self,
            _event: Event,
        ) -> impl Future<Output = Result<(), StorePilotError>> + Send {
            async { Ok(()) }
        }
    }

    fn entry(id: &str, target: Option<Timestamp>) -> ScheduleEntry {
        ScheduleEntry::builder()
            .store_id(id)
            .display_name(format!("Store {id}"))
            .maybe_target_instant(target)
            .build()
            .unwrap()
    }

    fn setup() -> (
        Arc<CountingBackend>,
        Arc<DispatchCoordinator<Arc<CountingBackend>, NullPublisher>>,
        AutoStartMonitor<Arc<CountingBackend>, NullPublisher>,
        ScheduleHandle,
    ) {
        let backend = Arc::new(CountingBackend::default());
        let coordinator = Arc::new(DispatchCoordinator::new(
            Arc::clone(&backend),
            NullPublisher,
            Clock::local(),
        ));
        let (monitor, handle) = AutoStartMonitor::new(Arc::clone(&coordinator), Clock::local());
        (backend, coordinator, monitor, handle)
    }

    async fn settle(handles: Vec<JoinHandle<SingleDispatch>>) -> Vec<SingleDispatch> {
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results
    }

    #[tokio::test]
    async fn should_dispatch_due_entry_on_tick() {
        let (backend, coordinator, monitor, handle) = setup();
        let past = storepilot_domain::time::now() - Duration::seconds(5);
        handle.replace(vec![entry("s1", Some(past))]);

        let results = settle(monitor.tick()).await;

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], SingleDispatch::Done(_)));
        assert_eq!(backend.launch_count(&StoreId::new("s1")), 1);
        assert_eq!(
            coordinator.status_of(&StoreId::new("s1")),
            AutomationStatus::Launched
        );
    }

    #[tokio::test]
    async fn should_not_dispatch_future_or_targetless_entries() {
        let (backend, _, monitor, handle) = setup();
        let future = storepilot_domain::time::now() + Duration::hours(1);
        handle.replace(vec![entry("later", Some(future)), entry("manual", None)]);

        let results = settle(monitor.tick()).await;

        assert!(results.is_empty());
        assert_eq!(backend.launch_count(&StoreId::new("later")), 0);
        assert_eq!(backend.launch_count(&StoreId::new("manual")), 0);
    }

    #[tokio::test]
    async fn should_fire_exactly_once_over_repeated_ticks() {
        let (backend, _, monitor, handle) = setup();
        let past = storepilot_domain::time::now() - Duration::seconds(5);
        handle.replace(vec![entry("s1", Some(past))]);

        settle(monitor.tick()).await;
        settle(monitor.tick()).await;
        settle(monitor.tick()).await;

        assert_eq!(backend.launch_count(&StoreId::new("s1")), 1);
    }

    #[tokio::test]
    async fn should_not_refire_failed_entry() {
        let (backend, coordinator, monitor, handle) = setup();
        backend.fail_for("s1");
        let past = storepilot_domain::time::now() - Duration::seconds(5);
        handle.replace(vec![entry("s1", Some(past))]);

        settle(monitor.tick()).await;
        assert_eq!(
            coordinator.status_of(&StoreId::new("s1")),
            AutomationStatus::Failed
        );

        settle(monitor.tick()).await;
        assert_eq!(backend.launch_count(&StoreId::new("s1")), 1);
    }

    #[tokio::test]
    async fn should_pick_up_replaced_schedule() {
        let (backend, _, monitor, handle) = setup();
        let past = storepilot_domain::time::now() - Duration::seconds(5);
        handle.replace(vec![entry("old", Some(past))]);
        settle(monitor.tick()).await;

        handle.replace(vec![entry("new", Some(past))]);
        settle(monitor.tick()).await;

        assert_eq!(backend.launch_count(&StoreId::new("old")), 1);
        assert_eq!(backend.launch_count(&StoreId::new("new")), 1);
    }

    #[tokio::test]
    async fn should_not_refire_after_manual_dispatch() {
        let (backend, coordinator, monitor, handle) = setup();
        let past = storepilot_domain::time::now() - Duration::seconds(5);
        let e = entry("s1", Some(past));
        handle.replace(vec![e.clone()]);

        coordinator
            .dispatch_single(&e, DispatchOrigin::Manual, true)
            .await;
        settle(monitor.tick()).await;

        assert_eq!(backend.launch_count(&StoreId::new("s1")), 1);
    }

    #[tokio::test]
    async fn should_stop_run_loop_when_handle_dropped() {
        let (_, _, monitor, handle) = setup();
        let task = tokio::spawn(monitor.run());
        drop(handle);
        tokio::time::timeout(std::time::Duration::from_secs(3), task)
            .await
            .expect("run loop did not stop")
            .unwrap();
    }
}
