//! Shared fixtures: a scripted extractor and an app wired to a temp directory

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::Router;
use clippers::backend::{app_router, AppState};
use clippers::downloader::{AdmissionGate, DownloadService, DownloadsDir, SettlePolicy};
use clippers::extractor::{DownloadSpec, Extractor, RawFormat, VideoInfo};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, Semaphore};

pub const MEDIA_BYTES: &[u8] = b"not really an mp4";

/// What the fake does when asked to download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    /// Write `<id>.mp4` plus a thumbnail sidecar
    WriteFile,
    /// Report success without writing anything
    NoFile,
    /// Report an extractor failure
    Fail,
}

pub struct FakeExtractor {
    info: VideoInfo,
    info_fails: bool,
    mode: DownloadMode,
    /// When set, downloads block until a permit is added
    release: Option<Arc<Semaphore>>,
    pub started: Arc<Notify>,
    pub downloads: AtomicUsize,
    pub selectors: Mutex<Vec<String>>,
    pub urls: Mutex<Vec<String>>,
}

impl FakeExtractor {
    pub fn new(info: VideoInfo) -> Self {
        Self {
            info,
            info_fails: false,
            mode: DownloadMode::WriteFile,
            release: None,
            started: Arc::new(Notify::new()),
            downloads: AtomicUsize::new(0),
            selectors: Mutex::new(Vec::new()),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_info(mut self) -> Self {
        self.info_fails = true;
        self
    }

    pub fn with_mode(mut self, mode: DownloadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn held_by(mut self, release: Arc<Semaphore>) -> Self {
        self.release = Some(release);
        self
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn extract_info(&self, url: &str) -> Result<VideoInfo> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.info_fails {
            return Err(anyhow!("ERROR: Unsupported URL: {url}"));
        }
        Ok(self.info.clone())
    }

    async fn download(&self, spec: &DownloadSpec) -> Result<VideoInfo> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.selectors
            .lock()
            .unwrap()
            .push(spec.format_selector.clone());
        self.started.notify_one();

        if let Some(release) = &self.release {
            release.acquire().await?.forget();
        }

        match self.mode {
            DownloadMode::Fail => Err(anyhow!("ERROR: Requested format is not available")),
            DownloadMode::NoFile => Ok(self.info.clone()),
            DownloadMode::WriteFile => {
                let media = output_path(spec, "mp4");
                tokio::fs::write(&media, MEDIA_BYTES).await?;
                tokio::fs::write(output_path(spec, "jpg"), b"thumb").await?;
                let mut info = self.info.clone();
                info.format = Some("22 - 1280x720 (720p)".to_string());
                Ok(info)
            }
        }
    }
}

fn output_path(spec: &DownloadSpec, ext: &str) -> PathBuf {
    PathBuf::from(
        spec.output_template
            .to_string_lossy()
            .replace("%(ext)s", ext),
    )
}

pub fn raw_format(id: &str, resolution: &str, vcodec: &str, acodec: &str) -> RawFormat {
    RawFormat {
        format_id: id.to_string(),
        ext: Some("mp4".to_string()),
        resolution: Some(resolution.to_string()),
        vcodec: Some(vcodec.to_string()),
        acodec: Some(acodec.to_string()),
        ..Default::default()
    }
}

pub fn sample_info() -> VideoInfo {
    VideoInfo {
        title: "Sample Video".to_string(),
        duration: Some(60.0),
        thumbnail: Some("https://example.com/v1.jpg".to_string()),
        formats: vec![
            raw_format("a", "720p", "h264", "aac"),
            raw_format("b", "480p", "h264", "aac"),
            raw_format("c", "1080p", "none", "aac"),
        ],
        ..Default::default()
    }
}

pub fn fast_settle() -> SettlePolicy {
    SettlePolicy::new(Duration::from_millis(10), Duration::from_millis(300))
}

pub fn service(extractor: Arc<FakeExtractor>, dir: &Path) -> DownloadService {
    let extractor: Arc<dyn Extractor> = extractor;
    DownloadService::new(extractor, DownloadsDir::new(dir))
        .with_settle(fast_settle())
        .with_gate(AdmissionGate::new(3, Duration::from_millis(200)))
}

pub fn app(extractor: Arc<FakeExtractor>, dir: &Path) -> Router {
    app_router(AppState::new(service(extractor, dir)))
}
