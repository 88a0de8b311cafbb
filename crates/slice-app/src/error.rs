use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not logged in: pass --token or set SLICE_API_TOKEN")]
    NotAuthenticated,

    #[error("Backend is unhealthy: {0}")]
    Unhealthy(String),

    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("Stopped watching job {0}; it keeps running on the server")]
    Interrupted(String),
}
