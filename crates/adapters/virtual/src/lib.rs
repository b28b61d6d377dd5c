//! # storepilot-adapter-virtual
//!
//! Simulated [`AutomationBackend`] for demos and tests.
//!
//! Every launch succeeds unless an outcome has been scripted for the store,
//! and an optional latency delays each call to mimic a real automation
//! session starting up. The backend records every launch config and stop
//! request it receives so tests can assert on exactly what crossed the port.
//!
//! ## Dependency rule
//! Depends on `storepilot-app` (port traits) and `storepilot-domain` only.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::info;

use storepilot_app::ports::AutomationBackend;
use storepilot_domain::error::StorePilotError;
use storepilot_domain::id::StoreId;
use storepilot_domain::launch::{LaunchConfig, LaunchOutcome, StopAck};

/// Simulated automation backend.
#[derive(Debug, Default)]
pub struct VirtualBackend {
    latency: Option<Duration>,
    scripted: Mutex<HashMap<StoreId, LaunchOutcome>>,
    launches: Mutex<Vec<LaunchConfig>>,
    stops: Mutex<Vec<StoreId>>,
}

impl VirtualBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every launch and stop by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Script the outcome returned for a store's next launches.
    pub fn script_outcome(&self, store_id: StoreId, outcome: LaunchOutcome) {
        lock(&self.scripted).insert(store_id, outcome);
    }

    /// Every launch config received so far, in order.
    #[must_use]
    pub fn launches(&self) -> Vec<LaunchConfig> {
        lock(&self.launches).clone()
    }

    /// Every stop request received so far, in order.
    #[must_use]
    pub fn stops(&self) -> Vec<StoreId> {
        lock(&self.stops).clone()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl AutomationBackend for VirtualBackend {
    fn launch(
        &self,
        config: LaunchConfig,
    ) -> impl Future<Output = Result<LaunchOutcome, StorePilotError>> + Send {
        async move {
            self.simulate_latency().await;
            info!(store = %config.store_id, "virtual launch");
            let outcome = lock(&self.scripted)
                .get(&config.store_id)
                .cloned()
                .unwrap_or_else(|| LaunchOutcome::success("virtual session started"));
            lock(&self.launches).push(config);
            Ok(outcome)
        }
    }

    fn stop(
        &self,
        store_id: &StoreId,
    ) -> impl Future<Output = Result<StopAck, StorePilotError>> + Send {
        let store_id = store_id.clone();
        async move {
            self.simulate_latency().await;
            info!(store = %store_id, "virtual stop");
            lock(&self.stops).push(store_id);
            Ok(StopAck { acknowledged: true })
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id: &str) -> LaunchConfig {
        LaunchConfig {
            store_id: StoreId::new(id),
            display_name: format!("Store {id}"),
            target_instant: None,
            visit_date: "2025-05-29".to_owned(),
            visit_time: "14:00".to_owned(),
            carrier: "SKT".to_owned(),
            email: "user@example.com".to_owned(),
            client_time: None,
        }
    }

    #[tokio::test]
    async fn should_succeed_by_default_and_record_launch() {
        let backend = VirtualBackend::new();

        let outcome = backend.launch(config("s1")).await.unwrap();

        assert!(outcome.success);
        let launches = backend.launches();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].store_id, StoreId::new("s1"));
    }

    #[tokio::test]
    async fn should_return_scripted_outcome() {
        let backend = VirtualBackend::new();
        backend.script_outcome(StoreId::new("s1"), LaunchOutcome::failure("sold out"));

        let outcome = backend.launch(config("s1")).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.message, "sold out");
    }

    #[tokio::test]
    async fn should_resolve_batch_in_input_order() {
        let backend = VirtualBackend::new();
        backend.script_outcome(StoreId::new("b"), LaunchOutcome::failure("sold out"));

        let outcomes = backend
            .launch_batch(vec![config("a"), config("b"), config("c")])
            .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
        assert!(outcomes[2].success);
    }

    #[tokio::test]
    async fn should_acknowledge_and_record_stop() {
        let backend = VirtualBackend::new();

        let ack = backend.stop(&StoreId::new("s1")).await.unwrap();

        assert!(ack.acknowledged);
        assert_eq!(backend.stops(), vec![StoreId::new("s1")]);
    }

    #[tokio::test]
    async fn should_apply_configured_latency() {
        let backend = VirtualBackend::new().with_latency(Duration::from_millis(20));
        let started = std::time::Instant::now();

        backend.launch(config("s1")).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
