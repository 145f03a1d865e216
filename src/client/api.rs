//! HTTP client for the Clippers API

use crate::backend::messages::{DownloadRequest, DownloadResponse, ErrorBody, InfoRequest, MessageResponse};
use crate::downloader::store::validate_id;
use crate::extractor::VideoSummary;
use crate::utils::error::ClippersError;
use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::{Client, Response};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClippersError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    /// Absolute URL for a server-relative path such as `/downloads/<file>`
    ///
    /// The path is appended to the base, so a base mounted under a prefix keeps it.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ClippersError::InvalidUrl(format!("{joined}: {e}")).into())
    }

    pub async fn video_info(&self, url: &str) -> Result<VideoSummary> {
        let response = self
            .http
            .post(self.resolve("/api/video-info")?)
            .json(&InfoRequest {
                url: Some(url.to_string()),
            })
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn download(&self, url: &str, format_id: Option<&str>) -> Result<DownloadResponse> {
        let response = self
            .http
            .post(self.resolve("/api/download")?)
            .json(&DownloadRequest {
                url: Some(url.to_string()),
                format_id: format_id.map(str::to_string),
            })
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Ask the server to remove every file of `download_id`
    ///
    /// The id is checked locally and sent as one percent-encoded path segment.
    pub async fn cleanup(&self, download_id: &str) -> Result<String> {
        validate_id(download_id)?;
        let mut url = self.resolve("/api/downloads")?;
        url.path_segments_mut()
            .map_err(|_| ClippersError::InvalidUrl(self.base_url.to_string()))?
            .push(download_id);

        let response = self.http.delete(url).send().await?;
        let body: MessageResponse = check(response).await?.json().await?;
        Ok(body.message)
    }

    /// Stream a served file to `dest`; returns the number of bytes written
    ///
    /// Data goes to a `.part` sibling first and is renamed into place only once
    /// the whole body arrived, so a failed transfer never leaves `dest` behind.
    pub async fn save_file(&self, download_url: &str, dest: &Path) -> Result<u64> {
        let response = self.http.get(self.resolve(download_url)?).send().await?;
        let response = check(response).await?;

        let partial = partial_path(dest);
        let written = match stream_to_file(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&partial).await {
                    debug!("Could not remove {}: {}", partial.display(), remove_err);
                }
                return Err(e);
            }
        };

        tokio::fs::rename(&partial, dest)
            .await
            .with_context(|| format!("Failed to move download to {}", dest.display()))?;

        info!("Saved {} bytes to {}", written, dest.display());
        Ok(written)
    }
}

async fn stream_to_file(response: Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// `<dir>/.<name>.part` next to the final destination
fn partial_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());
    dest.with_file_name(format!(".{name}.part"))
}

/// Turn a non-2xx response into an error carrying the server's `{ error }` text
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    debug!("Server answered {}: {}", status, message);
    Err(ClippersError::OperationFailed(format!("{status}: {message}")).into())
}
