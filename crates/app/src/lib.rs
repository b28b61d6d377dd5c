//! # storepilot-app
//!
//! Application layer — orchestration and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound):
//!   - `AutomationBackend` — launch, batch-launch, and stop automation sessions
//!   - `ConfigurationSource` — fetch the store list and per-store schedules
//!   - `EventPublisher` — publish lifecycle events
//! - Provide the orchestration core:
//!   - `DispatchCoordinator` — single/batch dispatch, stop, full reset,
//!     selection handling, backend-result reconciliation
//!   - `AutoStartMonitor` — the shared 1-second tick that fires due entries
//!   - `StatusBoard` — per-store lifecycle state, single point of mutation
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `storepilot-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod dispatcher;
pub mod event_bus;
pub mod monitor;
pub mod ports;
pub mod status_board;
