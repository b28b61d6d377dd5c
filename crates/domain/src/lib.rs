//! # storepilot-domain
//!
//! Pure domain model for the storepilot launch scheduler.
//!
//! ## Responsibilities
//! - Foundational types: identifiers, error conventions, timestamps and the
//!   session [`Clock`](time::Clock)
//! - Normalize heterogeneous upstream timestamp encodings into one canonical
//!   instant ([`datetime`])
//! - Define **ScheduleEntry** (one store's launch configuration)
//! - Define **AutomationStatus** (per-store lifecycle state machine)
//! - Define **SelectionSet** (stores chosen for manual batch dispatch)
//! - Define launch wire values and the early-start confirmation rule
//! - Define **Events** (dispatch lifecycle records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod datetime;
pub mod event;
pub mod launch;
pub mod schedule;
pub mod selection;
pub mod status;
