//! Drives one remote job to a terminal state.
//!
//! A poll loop issues one status request, hands the snapshot to the caller,
//! then either stops (`completed`, `failed`, transport error, cancellation) or
//! sleeps for the fixed interval and asks again. Requests for one job never
//! overlap, and nothing is sent once a terminal status has been seen.
//!
//! The interval is fixed on purpose: no backoff, no jitter, no retry. A failed
//! request ends the loop and the caller decides whether to start another.

use std::time::Duration;
use slice_core::{JobId, JobSnapshot, JobStatus};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};
use crate::config::{ClientConfig, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT};
use crate::error::{ClientError, PollError};
use crate::source::JobStatusSource;

pub struct JobPoller<S> {
    source: S,
    interval: Duration,
    request_timeout: Option<Duration>,
}

impl<S: JobStatusSource> JobPoller<S> {
    /// Poller with the default 2 s interval and 30 s per-request timeout.
    pub fn new(source: S) -> Self {
        Self {
            source,
            interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    pub fn from_config(source: S, config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(source)
            .with_interval(config.poll_interval)?
            .with_request_timeout(Some(config.request_timeout))
    }

    pub fn with_interval(mut self, interval: Duration) -> Result<Self, ClientError> {
        if interval.is_zero() {
            return Err(ClientError::Config("poll interval must be greater than zero".to_string()));
        }
        self.interval = interval;
        Ok(self)
    }

    /// `None` waits on each request for as long as the source takes.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Result<Self, ClientError> {
        if timeout.is_some_and(|t| t.is_zero()) {
            return Err(ClientError::Config("request timeout must be greater than zero".to_string()));
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Poll until the job completes or fails, without progress updates.
    pub async fn wait(&self, job_id: &JobId) -> Result<JobSnapshot, PollError> {
        self.poll(job_id, |_| {}, &CancellationToken::new()).await
    }

    /// Poll until a terminal state, calling `on_update` with every snapshot in
    /// the order received, the terminal one included.
    ///
    /// Resolves with the `completed` snapshot. A `failed` job yields
    /// [`PollError::JobFailed`] carrying the job's message.
    pub async fn poll<F>(
        &self,
        job_id: &JobId,
        mut on_update: F,
        cancel: &CancellationToken,
    ) -> Result<JobSnapshot, PollError>
    where
        F: FnMut(&JobSnapshot),
    {
        let mut polls: u64 = 0;

        loop {
            let snapshot = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(job_id = %job_id, polls, "polling cancelled");
                    return Err(PollError::Cancelled);
                }
                result = self.fetch(job_id) => match result {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        warn!(job_id = %job_id, polls, error = %e, "status request failed, polling stopped");
                        return Err(PollError::Source(e));
                    }
                },
            };
            polls += 1;

            on_update(&snapshot);

            match snapshot.status {
                JobStatus::Completed => {
                    info!(job_id = %job_id, polls, "job completed");
                    return Ok(snapshot);
                }
                JobStatus::Failed => {
                    let message = snapshot.failure_message();
                    info!(job_id = %job_id, polls, %message, "job failed");
                    return Err(PollError::JobFailed(message));
                }
                JobStatus::Pending | JobStatus::Processing => {
                    debug!(
                        job_id = %job_id,
                        status = %snapshot.status,
                        progress = snapshot.progress_percent,
                        "job still running"
                    );
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(job_id = %job_id, polls, "polling cancelled");
                    return Err(PollError::Cancelled);
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    async fn fetch(&self, job_id: &JobId) -> Result<JobSnapshot, ClientError> {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.fetch_status(job_id))
                .await
                .map_err(|_| ClientError::Timeout(limit))?,
            None => self.source.fetch_status(job_id).await,
        }
    }
}

impl<S: JobStatusSource + 'static> JobPoller<S> {
    /// Run the poll loop as a background task.
    ///
    /// Dropping the returned handle cancels the loop.
    pub fn spawn<F>(self, job_id: JobId, on_update: F) -> PollHandle
    where
        F: FnMut(&JobSnapshot) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task_job_id = job_id.clone();

        let task = tokio::spawn(async move {
            self.poll(&task_job_id, on_update, &token).await
        });

        PollHandle {
            job_id,
            guard: cancel.clone().drop_guard(),
            cancel,
            task,
        }
    }
}

/// Handle to a spawned poll loop.
pub struct PollHandle {
    job_id: JobId,
    cancel: CancellationToken,
    guard: DropGuard,
    task: JoinHandle<Result<JobSnapshot, PollError>>,
}

impl PollHandle {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Stop the loop. No request is issued after this returns, though one
    /// already in flight is abandoned rather than awaited.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop's outcome.
    pub async fn join(self) -> Result<JobSnapshot, PollError> {
        let PollHandle { guard, task, .. } = self;

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(PollError::Cancelled),
        };

        // The loop is over; leave any shared clones of the token untouched.
        let _ = guard.disarm();
        outcome
    }
}
