use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not connect within {0:?}")]
    ConnectTimeout(Duration),

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a poll loop ended without a completed job.
#[derive(Error, Debug)]
pub enum PollError {
    /// The backend reported the job as failed; holds the job's message.
    #[error("{0}")]
    JobFailed(String),

    #[error(transparent)]
    Source(#[from] ClientError),

    #[error("polling cancelled")]
    Cancelled,
}

impl PollError {
    pub fn is_job_failure(&self) -> bool {
        matches!(self, Self::JobFailed(_))
    }
}
