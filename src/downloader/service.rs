//! Orchestration behind the info, download and cleanup endpoints

use crate::downloader::gate::AdmissionGate;
use crate::downloader::job::DownloadJob;
use crate::downloader::settle::{wait_for_media, SettlePolicy};
use crate::downloader::store::{validate_id, DownloadsDir};
use crate::extractor::{Extractor, VideoInfo, VideoSummary};
use crate::utils::config::AppSettings;
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A download whose media file is on disk and stable
#[derive(Debug, Clone)]
pub struct CompletedDownload {
    pub id: String,
    pub filename: String,
    /// Metadata yt-dlp printed for the download
    pub info: VideoInfo,
}

pub struct DownloadService {
    extractor: Arc<dyn Extractor>,
    store: DownloadsDir,
    gate: AdmissionGate,
    settle: SettlePolicy,
    default_selector: String,
}

impl DownloadService {
    /// Build a service with the default settings
    pub fn new(extractor: Arc<dyn Extractor>, store: DownloadsDir) -> Self {
        Self::from_settings(extractor, store, &AppSettings::default())
    }

    /// Build a service with gate, settle policy and default selector taken from `settings`
    pub fn from_settings(extractor: Arc<dyn Extractor>, store: DownloadsDir, settings: &AppSettings) -> Self {
        Self {
            extractor,
            store,
            gate: AdmissionGate::new(settings.max_concurrent_downloads, settings.admission_wait()),
            settle: SettlePolicy::new(settings.settle_poll_interval(), settings.settle_timeout()),
            default_selector: settings.default_format.clone(),
        }
    }

    /// Concurrency limit of the admission gate
    pub fn download_slots(&self) -> usize {
        self.gate.limit()
    }

    pub fn with_gate(mut self, gate: AdmissionGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_settle(mut self, settle: SettlePolicy) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_default_selector(mut self, selector: &str) -> Self {
        self.default_selector = selector.to_string();
        self
    }

    pub fn store(&self) -> &DownloadsDir {
        &self.store
    }

    /// Metadata plus the muxed formats, best resolution first
    pub async fn fetch_info(&self, url: &str) -> Result<VideoSummary> {
        let info = self.extractor.extract_info(url).await?;
        let summary = VideoSummary::from_info(&info);
        info!(
            "Fetched {:?}: {} of {} formats usable",
            summary.title,
            summary.formats.len(),
            info.formats.len()
        );
        Ok(summary)
    }

    /// Run one download to completion and locate its file
    pub async fn download(&self, url: &str, format_id: Option<&str>) -> Result<CompletedDownload> {
        let job = DownloadJob::new(url, format_id, &self.default_selector, self.store.root())?;
        let _permit = self.gate.admit().await?;

        info!("Download {} accepted for {}", job.id, url);
        let started = Instant::now();

        let info = self.extractor.download(&job.spec).await?;
        let file = wait_for_media(&self.store, &job.id, self.settle).await.map_err(|e| {
            warn!("Download {} finished but its file did not settle: {}", job.id, e);
            e
        })?;

        info!(
            "Download {} finished in {:.1}s: {} ({} bytes)",
            job.id,
            started.elapsed().as_secs_f64(),
            file.filename,
            file.size
        );

        Ok(CompletedDownload {
            id: job.id,
            filename: file.filename,
            info,
        })
    }

    /// Remove every file belonging to `id`
    pub async fn cleanup(&self, id: &str) -> Result<usize> {
        validate_id(id)?;
        self.store.remove_prefixed(id).await
    }
}
