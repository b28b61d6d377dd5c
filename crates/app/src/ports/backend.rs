//! Automation backend port — the opaque executor of launch sessions.
//!
//! The backend performs the actual browser-driven work; this core only
//! hands it a resolved [`LaunchConfig`] and reads back the tagged
//! `{success, message}` outcome. The scheduler imposes no timeout of its
//! own on an outstanding call: a launch that never resolves leaves the
//! store `Dispatching` until the user stops or resets it.

use std::future::Future;

use futures::future::join_all;

use storepilot_domain::error::StorePilotError;
use storepilot_domain::id::StoreId;
use storepilot_domain::launch::{LaunchConfig, LaunchOutcome, StopAck};

/// Executes automation sessions on behalf of the scheduler.
pub trait AutomationBackend: Send + Sync {
    /// Launch one automation session.
    ///
    /// `Err` means the request itself failed (transport); a session that
    /// started but reported a problem comes back as
    /// `Ok(LaunchOutcome { success: false, .. })`.
    fn launch(
        &self,
        config: LaunchConfig,
    ) -> impl Future<Output = Result<LaunchOutcome, StorePilotError>> + Send;

    /// Launch several sessions at once, starting them together.
    ///
    /// One outcome per input config, in order. A transport failure for one
    /// session is folded into a failed outcome for that session only, so
    /// siblings are never blocked or rolled back.
    fn launch_batch(
        &self,
        configs: Vec<LaunchConfig>,
    ) -> impl Future<Output = Vec<LaunchOutcome>> + Send {
        async move {
            let results = join_all(configs.into_iter().map(|config| self.launch(config))).await;
            results
                .into_iter()
                .map(|result| result.unwrap_or_else(|err| LaunchOutcome::failure(err.to_string())))
                .collect()
        }
    }

    /// Ask the backend to cancel a running session. Best-effort: the
    /// session may not be interruptible.
    fn stop(
        &self,
        store_id: &StoreId,
    ) -> impl Future<Output = Result<StopAck, StorePilotError>> + Send;
}

impl<T: AutomationBackend> AutomationBackend for std::sync::Arc<T> {
    fn launch(
        &self,
        config: LaunchConfig,
    ) -> impl Future<Output = Result<LaunchOutcome, StorePilotError>> + Send {
        (**self).launch(config)
    }

    fn launch_batch(
        &self,
        configs: Vec<LaunchConfig>,
    ) -> impl Future<Output = Vec<LaunchOutcome>> + Send {
        (**self).launch_batch(configs)
    }

    fn stop(
        &self,
        store_id: &StoreId,
    ) -> impl Future<Output = Result<StopAck, StorePilotError>> + Send {
        (**self).stop(store_id)
    }
}
