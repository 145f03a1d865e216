use crate::downloader::DownloadService;
use std::sync::Arc;

/// Shared handler state; the downloads directory is reached only through the service
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DownloadService>,
}

impl AppState {
    pub fn new(service: DownloadService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
