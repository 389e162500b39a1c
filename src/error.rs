use std::time::Duration;

use thiserror::Error;

/// Failures of a single webhook attempt, as seen by the retrying caller.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("webhook call timed out after {0:?}")]
    Timeout(Duration),

    #[error("webhook transport error: {0:#}")]
    Transport(anyhow::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("webhook timed out, last deadline {0:?}")]
    Timeout(Duration),

    #[error("webhook responded with HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("webhook transport error: {0:#}")]
    Transport(anyhow::Error),

    #[error("malformed webhook response: {0}")]
    MalformedResponse(String),

    #[error("invalid investment request: {0}")]
    InvalidRequest(String),
}

impl From<FetchError> for AdvisorError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout(after) => AdvisorError::Timeout(after),
            FetchError::Transport(e) => AdvisorError::Transport(e),
        }
    }
}
