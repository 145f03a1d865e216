//! The downloads directory as an injected dependency
//!
//! Handlers never touch the filesystem directly; they go through a
//! [`DownloadsDir`], which owns the root path and knows how to enumerate,
//! locate and remove the files belonging to one download identifier.

use crate::utils::error::ClippersError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Extensions yt-dlp writes next to the media file
const SIDECAR_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "json", "part", "ytdl"];

#[derive(Debug, Clone)]
pub struct DownloadsDir {
    root: PathBuf,
}

/// A file found on disk together with its current size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub size: u64,
}

impl DownloadsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if absent
    pub async fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        Ok(())
    }

    /// Names of all regular files in the directory
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .with_context(|| format!("Failed to read {}", self.root.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// The media file produced for `id`, ignoring sidecars and partial files
    pub async fn find_media(&self, id: &str) -> Result<Option<StoredFile>> {
        let Some(filename) = self
            .list()
            .await?
            .into_iter()
            .find(|name| name.starts_with(id) && !is_sidecar(name))
        else {
            return Ok(None);
        };

        // The file may vanish between listing and stat (yt-dlp renames on merge).
        match fs::metadata(self.root.join(&filename)).await {
            Ok(metadata) => Ok(Some(StoredFile {
                filename,
                size: metadata.len(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every file whose name starts with `id`; returns how many went.
    pub async fn remove_prefixed(&self, id: &str) -> Result<usize> {
        validate_id(id)?;

        let mut removed = 0;
        for name in self.list().await? {
            if !name.starts_with(id) {
                continue;
            }
            match fs::remove_file(self.root.join(&name)).await {
                Ok(()) => {
                    debug!("Removed {}", name);
                    removed += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("{} disappeared before removal", name);
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!("Cleaned up {} file(s) for {}", removed, id);
        Ok(removed)
    }
}

/// True for thumbnails, info json and in-progress fragments
pub fn is_sidecar(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SIDECAR_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// An identifier is used as a file name prefix, so it must stay inside the directory
/// and must not be empty (which would match everything).
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']) {
        return Err(ClippersError::InvalidId(id.to_string()).into());
    }
    Ok(())
}
