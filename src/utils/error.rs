//! Error handling for Clippers

use std::time::Duration;
use thiserror::Error;

/// Main error type for Clippers
#[derive(Debug, Error)]
pub enum ClippersError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Failed to extract video info: {0}")]
    ExtractionError(String),

    #[error("Download failed: {0}")]
    DownloadError(String),

    #[error("Download completed but no file found for {0}")]
    FileNotFound(String),

    #[error("Timed out waiting for {0} to finish writing")]
    SettleTimeout(String),

    #[error("yt-dlp did not finish within {0:?}")]
    ExtractorTimeout(Duration),

    #[error("All download slots are busy")]
    CapacityExhausted,

    #[error("Invalid format selector: {0}")]
    InvalidFormat(String),

    #[error("Invalid download id: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
