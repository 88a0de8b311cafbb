//! HTTP client for the StackSlice backend and the job-status poller built on it.
//!
//! [`ApiClient`] talks to the backend's REST endpoints. [`JobPoller`] drives a
//! single job to a terminal state through any [`JobStatusSource`], surfacing
//! every snapshot it observes.

mod client;
mod config;
mod credentials;
mod error;
mod poller;
mod source;
pub mod upload;

pub use client::{ApiClient, ApiClientBuilder};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT};
pub use credentials::Credentials;
pub use error::{ClientError, PollError, Result};
pub use poller::{JobPoller, PollHandle};
pub use source::JobStatusSource;
pub use tokio_util::sync::CancellationToken;
