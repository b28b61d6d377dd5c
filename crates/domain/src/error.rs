//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`StorePilotError`] via `#[from]`. Adapters wrap their library errors
//! (HTTP, parsing) in [`BackendError`] / [`SourceError`] so nothing
//! adapter-specific leaks into the core.

/// Top-level error for the storepilot core.
#[derive(Debug, thiserror::Error)]
pub enum StorePilotError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced store does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The automation backend failed or was unreachable.
    #[error("backend error")]
    Backend(#[from] BackendError),

    /// The configuration source failed or returned garbage.
    #[error("configuration source error")]
    Source(#[from] SourceError),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A schedule entry was built without a store id.
    #[error("store id must not be empty")]
    EmptyStoreId,

    /// A schedule entry was built without a display name.
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// A lookup by id found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Store"`).
    pub entity: &'static str,
    /// The id that missed.
    pub id: String,
}

/// Transport-level failure talking to the automation backend.
///
/// A launch that *completes* with `success: false` is not a `BackendError` —
/// that outcome travels in [`LaunchOutcome`](crate::launch::LaunchOutcome).
#[derive(Debug, thiserror::Error)]
#[error("automation backend: {message}")]
pub struct BackendError {
    pub message: String,
}

/// Failure fetching or decoding upstream configuration.
#[derive(Debug, thiserror::Error)]
#[error("configuration source: {message}")]
pub struct SourceError {
    pub message: String,
}
