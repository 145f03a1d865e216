//! Request and response bodies of the HTTP API

use crate::downloader::CompletedDownload;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/video-info`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `POST /api/download`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub format_id: Option<String>,
}

/// Response of `POST /api/download`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub download_id: String,
    pub filename: String,
    /// Path relative to the server root, e.g. `/downloads/<id>.mp4`
    pub download_url: String,
    pub info: DownloadSummary,
}

/// Trimmed metadata echoed after a download
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DownloadSummary {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub format: Option<String>,
}

/// `{ message }` body of informational responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ error }` body of failed responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<CompletedDownload> for DownloadResponse {
    fn from(done: CompletedDownload) -> Self {
        let title = Some(done.info.title).filter(|t| !t.is_empty());
        Self {
            download_url: format!("/downloads/{}", done.filename),
            download_id: done.id,
            filename: done.filename,
            info: DownloadSummary {
                title,
                duration: done.info.duration,
                format: done.info.format,
            },
        }
    }
}

/// A request field counts as missing when absent or blank
pub fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
