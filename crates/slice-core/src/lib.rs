pub mod error;
pub mod job;
pub mod results;
pub mod account;

pub use error::CoreError;
pub use job::{JobId, JobSnapshot, JobStatus, FALLBACK_FAILURE_MESSAGE};
pub use results::{Caption, Clip, JobResults};
pub use account::{AuthToken, ErrorBody, HealthStatus, SubscriptionTier, UploadResponse, UserProfile};
