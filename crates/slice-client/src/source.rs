use std::sync::Arc;
use async_trait::async_trait;
use slice_core::{JobId, JobSnapshot};
use crate::error::Result;

/// Anything that can report the current state of a job.
///
/// [`crate::ApiClient`] is the production implementation.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobSnapshot>;
}

#[async_trait]
impl<T: JobStatusSource + ?Sized> JobStatusSource for Arc<T> {
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobSnapshot> {
        (**self).fetch_status(job_id).await
    }
}
