use std::env;
use std::time::Duration;
use crate::credentials::Credentials;
use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub credentials: Credentials,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            credentials: Credentials::None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read `.env` if present, then the `SLICE_*` environment variables.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ClientError::Config(format!("failed to read .env: {}", e)));
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("SLICE_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let credentials = lookup("SLICE_API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .map(Credentials::bearer)
            .unwrap_or_default();

        let poll_interval = match lookup("SLICE_POLL_INTERVAL_MS") {
            Some(raw) => Duration::from_millis(parse_positive("SLICE_POLL_INTERVAL_MS", &raw)?),
            None => DEFAULT_POLL_INTERVAL,
        };

        let request_timeout = match lookup("SLICE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_positive("SLICE_REQUEST_TIMEOUT_SECS", &raw)?),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            api_url,
            credentials,
            poll_interval,
            request_timeout,
        })
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<u64> {
    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ClientError::Config(format!("{} must be a number, got {:?}", key, raw)))?;

    if value == 0 {
        return Err(ClientError::Config(format!("{} must be greater than zero", key)));
    }

    Ok(value)
}
