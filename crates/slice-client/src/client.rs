//! Typed HTTP client for the StackSlice backend.

use std::path::Path;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use slice_core::{AuthToken, ErrorBody, HealthStatus, JobId, JobSnapshot, UploadResponse};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};
use crate::config::{ClientConfig, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::credentials::Credentials;
use crate::error::{ClientError, Result};
use crate::source::JobStatusSource;
use crate::upload;

const MIN_PASSWORD_LEN: usize = 8;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the backend's REST endpoints.
///
/// Cheap to clone; clones share one connection pool.
///
/// ```rust,no_run
/// use slice_client::{ApiClient, Credentials};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .base_url("http://localhost:8000")
///     .credentials(Credentials::bearer("eyJhbGc..."))
///     .build()?;
///
/// let health = client.health().await?;
/// println!("backend is {}", health.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    credentials: Credentials,
    request_timeout: Duration,
    upload_timeout: Option<Duration>,
    connect_timeout: Duration,
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::builder()
            .base_url(&config.api_url)
            .credentials(config.credentials.clone())
            .timeout(config.request_timeout)
            .build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Same transport and settings, different credentials. Used after login.
    pub fn with_credentials(&self, credentials: Credentials) -> Self {
        Self {
            credentials,
            ..self.clone()
        }
    }

    /// `GET /jobs/{job_id}`
    pub async fn job_status(&self, job_id: &JobId) -> Result<JobSnapshot> {
        let url = self.endpoint(&["jobs", job_id.as_str()])?;
        let snapshot: JobSnapshot = self
            .send_json(self.request(Method::GET, url), Some(self.request_timeout))
            .await?;
        debug!(job_id = %job_id, status = %snapshot.status, progress = snapshot.progress_percent, "job status");
        Ok(snapshot)
    }

    /// Validate and upload a video from disk. The file is streamed, never held
    /// in memory whole.
    pub async fn upload_video(&self, path: impl AsRef<Path>) -> Result<UploadResponse> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ClientError::InvalidUpload(format!("{} is not a valid file name", path.display()))
            })?
            .to_string();

        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();
        let mime = upload::validate(&file_name, size)?;

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = reqwest::multipart::Part::stream_with_length(body, size);
        self.send_upload(&file_name, mime, part, size).await
    }

    /// `POST /upload` as a multipart form with a single `file` field.
    pub async fn upload_bytes(&self, file_name: &str, contents: Vec<u8>) -> Result<UploadResponse> {
        let size = contents.len() as u64;
        let mime = upload::validate(file_name, size)?;
        let part = reqwest::multipart::Part::bytes(contents);
        self.send_upload(file_name, mime, part, size).await
    }

    /// Uploads are bounded by `upload_timeout` only; the per-request timeout
    /// for JSON calls does not apply to them.
    async fn send_upload(
        &self,
        file_name: &str,
        mime: &str,
        part: reqwest::multipart::Part,
        size: u64,
    ) -> Result<UploadResponse> {
        let part = part.file_name(file_name.to_string()).mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.endpoint(&["upload"])?;
        let request = self.credentials.apply(self.http.request(Method::POST, url));
        let response: UploadResponse = self
            .send_json(request.multipart(form), self.upload_timeout)
            .await?;

        info!(
            file = file_name,
            bytes = size,
            job_id = %response.job_id,
            credits_used = response.credits_used,
            "video uploaded"
        );
        Ok(response)
    }

    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken> {
        check_email(email)?;
        if password.is_empty() {
            return Err(ClientError::InvalidInput("password must not be empty".to_string()));
        }
        self.authenticate("login", email, password).await
    }

    /// `POST /auth/signup`
    pub async fn signup(&self, email: &str, password: &str) -> Result<AuthToken> {
        check_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        self.authenticate("signup", email, password).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&["health"])?;
        self.send_json(self.request(Method::GET, url), Some(self.request_timeout))
            .await
    }

    async fn authenticate(&self, action: &str, email: &str, password: &str) -> Result<AuthToken> {
        let url = self.endpoint(&["auth", action])?;
        let body = CredentialsRequest { email, password };
        let token: AuthToken = self
            .send_json(
                self.http.request(Method::POST, url).json(&body),
                Some(self.request_timeout),
            )
            .await?;
        info!(user = %token.user.email, "authenticated via {}", action);
        Ok(token)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("{} cannot be used as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.credentials.apply(self.http.request(method, url))
    }

    /// `limit` bounds the whole exchange, from connect to the end of the body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        limit: Option<Duration>,
    ) -> Result<T> {
        let request = match limit {
            Some(limit) => request.timeout(limit),
            None => request,
        };

        let start = Instant::now();
        let response = request.send().await.map_err(|e| self.transport_error(e, limit))?;
        let status = response.status();
        let url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, limit))?;
        debug!(%url, %status, elapsed = ?start.elapsed(), "response received");

        if !status.is_success() {
            let detail = error_detail(status, &body);
            warn!(%url, %status, %detail, "backend returned an error");
            return Err(ClientError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn transport_error(&self, e: reqwest::Error, limit: Option<Duration>) -> ClientError {
        if !e.is_timeout() {
            return ClientError::Transport(e);
        }
        // reqwest flags a connect timeout as both connect and timeout.
        if e.is_connect() {
            return ClientError::ConnectTimeout(self.connect_timeout);
        }
        match limit {
            Some(limit) => ClientError::Timeout(limit),
            None => ClientError::Transport(e),
        }
    }
}

#[async_trait]
impl JobStatusSource for ApiClient {
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobSnapshot> {
        self.job_status(job_id).await
    }
}

/// Prefer the backend's `detail`, then the raw body, then the status reason.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.detail;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

fn check_email(email: &str) -> Result<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ClientError::InvalidInput(format!("{:?} is not an email address", email))),
    }
}

pub struct ApiClientBuilder {
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
    upload_timeout: Option<Duration>,
    connect_timeout: Duration,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            credentials: Credentials::None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_timeout: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Upper bound on each JSON request, including reading the body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upper bound on a whole upload. Unset by default, so an upload runs
    /// until the server answers.
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        if self.timeout.is_zero() {
            return Err(ClientError::Config("request timeout must be greater than zero".to_string()));
        }
        if self.upload_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ClientError::Config("upload timeout must be greater than zero".to_string()));
        }

        let base_url = Url::parse(self.base_url.trim())
            .map_err(|e| ClientError::Config(format!("invalid base URL {:?}: {}", self.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("{} cannot be used as a base URL", base_url)));
        }

        // Only the connect phase is bounded client-wide; request timeouts are
        // set per call so uploads can run longer than status requests.
        let http = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()?;

        Ok(ApiClient {
            base_url,
            http,
            credentials: self.credentials,
            request_timeout: self.timeout,
            upload_timeout: self.upload_timeout,
            connect_timeout: self.connect_timeout,
        })
    }
}
