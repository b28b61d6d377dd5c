//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the orchestration
//! layer and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod backend;
pub mod config_source;
pub mod event_bus;

pub use backend::AutomationBackend;
pub use config_source::ConfigurationSource;
pub use event_bus::EventPublisher;
