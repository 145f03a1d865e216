//! Path resolution for the downloads directory
//!
//! The server is often launched from a process manager whose working directory
//! is not the project directory, so the configured downloads directory is
//! resolved to an absolute path once at startup and never used relatively.

use anyhow::{Context, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve `configured` against the current working directory.
pub fn resolve_downloads_dir(configured: &Path) -> Result<PathBuf> {
    let resolved = configured
        .absolutize()
        .with_context(|| format!("Failed to resolve {}", configured.display()))?
        .into_owned();

    debug!("Downloads directory: {:?}", resolved);
    Ok(resolved)
}

/// Where `clippers fetch --save-to` writes when only a file name is known.
pub fn default_save_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_downloads_dir_becomes_absolute() {
        let path = resolve_downloads_dir(Path::new("downloads")).unwrap();
        assert!(path.is_absolute(), "Downloads dir must be absolute path");
        assert!(path.ends_with("downloads"));
    }

    #[test]
    fn test_absolute_downloads_dir_is_normalized() {
        let path = resolve_downloads_dir(Path::new("/srv/media/../downloads")).unwrap();
        assert_eq!(path, PathBuf::from("/srv/downloads"));
    }
}
