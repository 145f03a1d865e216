//! HTTP error responses

use crate::backend::messages::ErrorBody;
use crate::utils::error::ClippersError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error};

/// Error returned by a handler, rendered as `{ error }`
///
/// The message is what the caller sees; the cause is only ever logged.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn url_required() -> Self {
        Self::bad_request("URL is required")
    }

    /// Classify a failure of the info endpoint
    pub fn from_info_error(err: anyhow::Error) -> Self {
        error!("Error getting video info: {:#}", err);
        Self::internal("Failed to get video information")
    }

    /// Classify a failure of the download endpoint
    pub fn from_download_error(err: anyhow::Error) -> Self {
        let api_error = match err.downcast_ref::<ClippersError>() {
            Some(ClippersError::InvalidFormat(_)) => Self::bad_request("Invalid format_id"),
            Some(ClippersError::CapacityExhausted) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Too many downloads in progress, try again later",
            ),
            Some(ClippersError::FileNotFound(_)) => {
                Self::internal("Download completed but file not found")
            }
            Some(ClippersError::SettleTimeout(_)) => {
                Self::internal("Timed out waiting for the downloaded file")
            }
            _ => Self::internal("Download failed"),
        };
        error!("Download error ({}): {:#}", api_error.status, err);
        api_error
    }

    /// Classify a failure of the cleanup endpoint
    pub fn from_cleanup_error(err: anyhow::Error) -> Self {
        match err.downcast_ref::<ClippersError>() {
            Some(ClippersError::InvalidId(_)) => Self::bad_request("Invalid download id"),
            _ => {
                error!("Error cleaning up downloads: {:#}", err);
                Self::internal("Failed to clean up downloads")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// A body that is not JSON or not an object is treated like a missing URL.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        Self::url_required()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_download_error_taxonomy() {
        let cases = [
            (ClippersError::InvalidFormat("-x".into()), StatusCode::BAD_REQUEST),
            (ClippersError::CapacityExhausted, StatusCode::SERVICE_UNAVAILABLE),
            (ClippersError::FileNotFound("id".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ClippersError::SettleTimeout("id".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ClippersError::ExtractorTimeout(Duration::from_secs(1)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from_download_error(err.into()).status, status);
        }
    }

    #[test]
    fn test_not_found_and_timeout_are_distinguishable() {
        let not_found = ApiError::from_download_error(ClippersError::FileNotFound("a".into()).into());
        let timeout = ApiError::from_download_error(ClippersError::SettleTimeout("a".into()).into());
        let failed = ApiError::from_download_error(anyhow::anyhow!("exit status 1"));

        assert_eq!(not_found.message, "Download completed but file not found");
        assert_ne!(not_found.message, timeout.message);
        assert_eq!(failed.message, "Download failed");
    }

    #[test]
    fn test_details_do_not_leak() {
        let err = ApiError::from_info_error(
            ClippersError::ExtractionError("ERROR: secret stderr".into()).into(),
        );
        assert_eq!(err.message, "Failed to get video information");
    }
}
