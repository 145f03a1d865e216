//! Endpoint handlers

use crate::backend::error::ApiError;
use crate::backend::messages::{
    required, DownloadRequest, DownloadResponse, InfoRequest, MessageResponse,
};
use crate::backend::state::AppState;
use crate::extractor::VideoSummary;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

pub const ROOT_MESSAGE: &str = "Video Downloader Backend Server is running!";

/// `GET /`
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(ROOT_MESSAGE))
}

/// `POST /api/video-info`
pub async fn video_info(
    State(state): State<AppState>,
    payload: Result<Json<InfoRequest>, JsonRejection>,
) -> Result<Json<VideoSummary>, ApiError> {
    let Json(request) = payload?;
    let url = required(&request.url).ok_or_else(ApiError::url_required)?;

    let summary = state
        .service
        .fetch_info(url)
        .await
        .map_err(ApiError::from_info_error)?;

    Ok(Json(summary))
}

/// `POST /api/download`
pub async fn download(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let Json(request) = payload?;
    let url = required(&request.url).ok_or_else(ApiError::url_required)?;
    let format_id = required(&request.format_id);

    let done = state
        .service
        .download(url, format_id)
        .await
        .map_err(ApiError::from_download_error)?;

    info!("Download successful: {}", done.filename);
    Ok(Json(done.into()))
}

/// `DELETE /api/downloads/{download_id}`
pub async fn cleanup(
    State(state): State<AppState>,
    Path(download_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .service
        .cleanup(&download_id)
        .await
        .map_err(ApiError::from_cleanup_error)?;

    Ok(Json(MessageResponse::new("Download files cleaned up")))
}
