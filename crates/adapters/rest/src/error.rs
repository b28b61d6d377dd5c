//! REST adapter error types.

use storepilot_domain::error::{SourceError, StorePilotError};

/// Errors specific to the REST configuration source.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The HTTP request could not be sent or the connection dropped.
    #[error("request to {endpoint} failed")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// The response body could not be decoded.
    #[error("failed to decode {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl RestError {
    /// Convert into a [`StorePilotError::Source`] for propagation across the
    /// port boundary.
    #[must_use]
    pub fn into_domain(self) -> StorePilotError {
        let message = match &self {
            Self::Request { source, .. } | Self::Decode { source, .. } => {
                format!("{self}: {source}")
            }
            Self::Status { .. } => self.to_string(),
        };
        StorePilotError::Source(SourceError { message })
    }
}

impl From<RestError> for StorePilotError {
    fn from(err: RestError) -> Self {
        err.into_domain()
    }
}
