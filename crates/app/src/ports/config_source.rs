//! Configuration source port — where schedules come from.
//!
//! The upstream service owns the store list and every user's per-store
//! settings. Adapters fetch both, merge them, and hand the core a fully
//! normalized entry list; malformed timestamps surface as entries without
//! a target instant, never as errors.

use std::future::Future;

use storepilot_domain::error::StorePilotError;
use storepilot_domain::schedule::ScheduleEntry;

/// Supplies the current schedule for every known store.
pub trait ConfigurationSource {
    /// Fetch and normalize the full entry list.
    fn fetch_schedule(
        &self,
    ) -> impl Future<Output = Result<Vec<ScheduleEntry>, StorePilotError>> + Send;
}

impl<T: ConfigurationSource + Send + Sync> ConfigurationSource for std::sync::Arc<T> {
    fn fetch_schedule(
        &self,
    ) -> impl Future<Output = Result<Vec<ScheduleEntry>, StorePilotError>> + Send {
        (**self).fetch_schedule()
    }
}
