//! Local checks applied before a video is sent to `POST /upload`.
//!
//! These mirror the backend's own rules so obviously bad files fail fast,
//! without spending a transfer. The backend still has the final word.

use std::path::Path;
use crate::error::{ClientError, Result};

pub const MAX_VIDEO_SIZE_MB: u64 = 500;
pub const MAX_VIDEO_SIZE_BYTES: u64 = MAX_VIDEO_SIZE_MB * 1024 * 1024;

/// Accepted extensions and the content type sent for each.
pub const ALLOWED_FORMATS: [(&str, &str); 3] = [
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
];

/// Returns the content type for `file_name`, or an error if the extension is not accepted.
pub fn content_type_for(file_name: &str) -> Result<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| {
            ClientError::InvalidUpload(format!("{} has no file extension", file_name))
        })?;

    ALLOWED_FORMATS
        .iter()
        .find(|(allowed, _)| *allowed == extension)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| {
            ClientError::InvalidUpload(
                "Invalid file type. Only MP4, MOV, and AVI are allowed.".to_string(),
            )
        })
}

pub fn check_size(size_bytes: u64) -> Result<()> {
    if size_bytes == 0 {
        return Err(ClientError::InvalidUpload("File is empty".to_string()));
    }
    if size_bytes > MAX_VIDEO_SIZE_BYTES {
        return Err(ClientError::InvalidUpload(format!(
            "File too large. Maximum size is {}MB",
            MAX_VIDEO_SIZE_MB
        )));
    }
    Ok(())
}

/// Validates name and size together; returns the content type to send.
pub fn validate(file_name: &str, size_bytes: u64) -> Result<&'static str> {
    let mime = content_type_for(file_name)?;
    check_size(size_bytes)?;
    Ok(mime)
}
