use std::fmt;
use serde::{Deserialize, Serialize};
use crate::error::CoreError;
use crate::results::{JobResults, null_as_default};

/// Message used when a failed job carries no explanation of its own.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Job failed";

/// Opaque identifier of a server-side processing job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::EmptyJobId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// No further transitions happen once a job reports this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            Self::Pending => "⏳",
            Self::Processing => "⚡",
            Self::Completed => "✅",
            Self::Failed => "❌",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One observation of a job, as returned by `GET /jobs/{job_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress_percent: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<JobResults>,
}

impl JobSnapshot {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Progress clamped to 0..=100; the server does not guarantee the range.
    pub fn progress(&self) -> u8 {
        self.progress_percent.min(100)
    }

    /// The job's own message, or [`FALLBACK_FAILURE_MESSAGE`] when it is blank.
    pub fn failure_message(&self) -> String {
        let message = self.message.trim();
        if message.is_empty() {
            FALLBACK_FAILURE_MESSAGE.to_string()
        } else {
            self.message.clone()
        }
    }
}
