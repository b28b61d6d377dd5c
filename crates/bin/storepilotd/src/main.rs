//! # storepilotd — storepilot daemon
//!
//! Composition root that wires the configuration source, automation
//! backend, and monitor together and runs the scheduler.
//!
//! ## Responsibilities
//! - Parse configuration (`storepilot.toml`, env vars)
//! - Construct the adapters and inject them via port traits
//! - Load the schedule and hand it to the auto-start monitor
//! - Subscribe to lifecycle events and log them
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storepilot_adapter_rest::RestConfigSource;
use storepilot_adapter_virtual::VirtualBackend;
use storepilot_app::dispatcher::DispatchCoordinator;
use storepilot_app::event_bus::InProcessEventBus;
use storepilot_app::monitor::AutoStartMonitor;
use storepilot_app::ports::{ConfigurationSource, EventPublisher};
use storepilot_domain::event::{Event, EventType};
use storepilot_domain::schedule::ScheduleEntry;
use storepilot_domain::time::{Clock, time_until};

use crate::config::Config;

/// How often the daemon logs a per-store status report.
const STATUS_REPORT_PERIOD: std::time::Duration = std::time::Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let clock = config.clock();
    info!(
        offset_seconds = config.clock.offset_seconds,
        "session clock ready"
    );

    let bus = Arc::new(InProcessEventBus::default());
    spawn_event_logger(bus.subscribe());

    let backend = Arc::new(VirtualBackend::new());
    let coordinator = Arc::new(DispatchCoordinator::new(backend, Arc::clone(&bus), clock));
    let (monitor, schedule) = AutoStartMonitor::new(Arc::clone(&coordinator), clock);

    let source = RestConfigSource::new(
        config.upstream.api_base.clone(),
        config.upstream.email.clone(),
    );
    let entries = source.fetch_schedule().await.context("fetching schedule")?;
    info!(count = entries.len(), "schedule loaded");
    let _ = bus
        .publish(Event::new(
            EventType::ScheduleLoaded,
            None,
            serde_json::json!({ "count": entries.len() }),
        ))
        .await;
    schedule.replace(entries.clone());

    let monitor_task = tokio::spawn(monitor.run());
    spawn_status_report(Arc::clone(&coordinator), entries, clock);

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown signal received, stopping monitor");
    drop(schedule);
    let _ = monitor_task.await;
    Ok(())
}

/// Log every lifecycle event crossing the bus.
fn spawn_event_logger(mut receiver: broadcast::Receiver<Event>) {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if event.event_type == EventType::StopRequested {
                        info!(
                            store = ?event.store_id,
                            data = %event.data,
                            "stop signal sent; the external session may need manual termination"
                        );
                    } else {
                        info!(
                            kind = ?event.event_type,
                            store = ?event.store_id,
                            data = %event.data,
                            "event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event logger lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Periodically log each store's status and the countdown to its target.
fn spawn_status_report(
    coordinator: Arc<DispatchCoordinator<Arc<VirtualBackend>, Arc<InProcessEventBus>>>,
    entries: Vec<ScheduleEntry>,
    clock: Clock,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATUS_REPORT_PERIOD);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let now = clock.now();
            for entry in &entries {
                let status = coordinator.status_of(&entry.store_id);
                match entry.target_instant {
                    Some(target) => info!(
                        store = %entry.store_id,
                        name = %entry.display_name,
                        status = %status,
                        remaining_seconds = time_until(now, target).num_seconds(),
                        "store status"
                    ),
                    None => info!(
                        store = %entry.store_id,
                        name = %entry.display_name,
                        status = %status,
                        "store status (no automatic trigger)"
                    ),
                }
            }
        }
    });
}
