//! Server startup

use crate::backend::routes::app_router;
use crate::backend::state::AppState;
use crate::downloader::{DownloadService, DownloadsDir};
use crate::extractor::{Extractor, YtDlpExtractor};
use crate::utils::config::AppSettings;
use crate::utils::paths::resolve_downloads_dir;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Wire the yt-dlp extractor and the downloads directory into a service
pub async fn build_service(settings: &AppSettings) -> Result<DownloadService> {
    let extractor = YtDlpExtractor::from_configured(settings.ytdlp_path.as_deref())?
        .with_timeout(settings.extractor_timeout());
    match extractor.version().await {
        Ok(version) => info!("yt-dlp version {}", version),
        Err(e) => warn!("Could not read yt-dlp version: {}", e),
    }

    let store = DownloadsDir::new(resolve_downloads_dir(&settings.downloads_dir)?);
    store.ensure().await?;

    let extractor: Arc<dyn Extractor> = Arc::new(extractor);
    Ok(DownloadService::from_settings(extractor, store, settings))
}

/// Run the HTTP server until Ctrl-C
pub async fn serve(settings: AppSettings) -> Result<()> {
    let service = build_service(&settings).await?;
    let downloads_dir = service.store().root().to_path_buf();
    let slots = service.download_slots();
    let app = app_router(AppState::new(service));

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Video Downloader Server is running on {}", addr);
    info!("Downloads directory: {}", downloads_dir.display());
    info!("Up to {} concurrent downloads", slots);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
