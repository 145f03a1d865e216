//! Clippers library

pub mod backend;
pub mod client;
pub mod downloader;
pub mod extractor;
pub mod utils;

// Re-export main types for easier use
pub use backend::{app_router, AppState};
pub use client::{ApiClient, ClientSession};
pub use downloader::{CompletedDownload, DownloadService, DownloadsDir};
pub use extractor::{Extractor, Format, VideoInfo, VideoSummary, YtDlpExtractor};
pub use utils::{AppSettings, ClippersError};
