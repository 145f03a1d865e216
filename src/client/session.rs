//! Client-side state for one analyze/download session
//!
//! Mirrors the single-view UI: each user action is one transition and one
//! network call. There is no cancellation and no automatic retry.

use crate::backend::messages::DownloadResponse;
use crate::client::api::ApiClient;
use crate::extractor::VideoSummary;
use anyhow::Result;
use tracing::error;
use url::Url;

pub const MSG_URL_MISSING: &str = "Please enter a video URL";
pub const MSG_URL_INVALID: &str = "Please enter a valid URL";
pub const MSG_FORMAT_MISSING: &str = "Please select a video quality";
pub const MSG_INFO_FAILED: &str =
    "Failed to get video information. Please check the URL and try again.";
pub const MSG_DOWNLOAD_FAILED: &str = "Failed to download video. Please try again.";

/// Where the session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Analyzing,
    InfoShown,
    Downloading,
    Complete,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ClientSession {
    url_input: String,
    video_info: Option<VideoSummary>,
    selected_format: Option<String>,
    phase: Phase,
    download: Option<DownloadResponse>,
    download_link: Option<String>,
    error: Option<String>,
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            url_input: String::new(),
            video_info: None,
            selected_format: None,
            phase: Phase::Idle,
            download: None,
            download_link: None,
            error: None,
        }
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url_input = url.into();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn video_info(&self) -> Option<&VideoSummary> {
        self.video_info.as_ref()
    }

    pub fn selected_format(&self) -> Option<&str> {
        self.selected_format.as_deref()
    }

    pub fn download(&self) -> Option<&DownloadResponse> {
        self.download.as_ref()
    }

    pub fn download_link(&self) -> Option<&str> {
        self.download_link.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Analyzing | Phase::Downloading)
    }

    /// Validate the entered URL and enter `Analyzing`.
    ///
    /// Returns the URL to analyze, or `None` with [`Self::error`] set.
    pub fn begin_analyze(&mut self) -> Option<String> {
        if self.is_busy() {
            return None;
        }

        let url = self.url_input.trim().to_string();
        if url.is_empty() {
            self.error = Some(MSG_URL_MISSING.to_string());
            return None;
        }
        if Url::parse(&url).is_err() {
            self.error = Some(MSG_URL_INVALID.to_string());
            return None;
        }

        self.error = None;
        self.video_info = None;
        self.selected_format = None;
        self.download = None;
        self.download_link = None;
        self.phase = Phase::Analyzing;
        Some(url)
    }

    /// Leave `Analyzing`; the first format is pre-selected on success.
    pub fn finish_analyze(&mut self, result: Result<VideoSummary>) {
        if self.phase != Phase::Analyzing {
            return;
        }

        match result {
            Ok(summary) => {
                self.selected_format = summary.formats.first().map(|f| f.format_id.clone());
                self.video_info = Some(summary);
                self.phase = Phase::InfoShown;
            }
            Err(e) => {
                error!("Error: {:#}", e);
                self.error = Some(MSG_INFO_FAILED.to_string());
                self.phase = Phase::Failed;
            }
        }
    }

    /// Pick one of the fetched formats; unknown ids are ignored.
    pub fn select_format(&mut self, format_id: &str) -> bool {
        let known = self
            .video_info
            .as_ref()
            .is_some_and(|info| info.formats.iter().any(|f| f.format_id == format_id));
        if known && !self.is_busy() {
            self.selected_format = Some(format_id.to_string());
        }
        known
    }

    /// Enter `Downloading`; returns the URL and format to request.
    pub fn begin_download(&mut self) -> Option<(String, String)> {
        if self.is_busy() || self.video_info.is_none() {
            return None;
        }
        let Some(format_id) = self.selected_format.clone() else {
            self.error = Some(MSG_FORMAT_MISSING.to_string());
            return None;
        };

        self.error = None;
        self.phase = Phase::Downloading;
        Some((self.url_input.trim().to_string(), format_id))
    }

    /// Leave `Downloading`; `link` is the absolute URL of the finished file.
    pub fn finish_download(&mut self, result: Result<(DownloadResponse, String)>) {
        if self.phase != Phase::Downloading {
            return;
        }

        match result {
            Ok((response, link)) => {
                self.download = Some(response);
                self.download_link = Some(link);
                self.phase = Phase::Complete;
            }
            Err(e) => {
                error!("Error: {:#}", e);
                self.error = Some(MSG_DOWNLOAD_FAILED.to_string());
                self.phase = Phase::Failed;
            }
        }
    }

    /// Analyze the entered URL against the server
    pub async fn analyze(&mut self, api: &ApiClient) {
        if let Some(url) = self.begin_analyze() {
            let result = api.video_info(&url).await;
            self.finish_analyze(result);
        }
    }

    /// Download the selected format through the server
    pub async fn download_selected(&mut self, api: &ApiClient) {
        if let Some((url, format_id)) = self.begin_download() {
            let result = match api.download(&url, Some(&format_id)).await {
                Ok(response) => api
                    .resolve(&response.download_url)
                    .map(|link| (response, link.to_string())),
                Err(e) => Err(e),
            };
            self.finish_download(result);
        }
    }
}
