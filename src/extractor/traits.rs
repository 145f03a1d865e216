use crate::extractor::models::{DownloadSpec, VideoInfo};
use anyhow::Result;
use async_trait::async_trait;

/// Core trait for video extractors
///
/// This trait isolates the HTTP layer from how metadata and media are
/// actually obtained (yt-dlp in production, fakes in tests).
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "ytdlp")
    fn id(&self) -> &'static str;

    /// Extracts video information without downloading
    async fn extract_info(&self, url: &str) -> Result<VideoInfo>;

    /// Downloads media according to `spec` and returns the metadata the
    /// extractor reported for it.
    ///
    /// Completion of this call does not guarantee the output file is visible
    /// yet; callers settle on the downloads directory afterwards.
    async fn download(&self, spec: &DownloadSpec) -> Result<VideoInfo>;

    /// Version string of the underlying tool
    async fn version(&self) -> Result<String> {
        Err(anyhow::anyhow!("Version not reported by {}", self.id()))
    }
}
