//! yt-dlp wrapper for video extraction and download
//!
//! Every invocation runs yt-dlp as a child process with `kill_on_drop`, so a
//! request that goes away takes its child with it. The URL is always passed
//! after `--` so it can never be read as an option.

use crate::extractor::models::{DownloadSpec, VideoInfo};
use crate::extractor::traits::Extractor;
use crate::utils::error::ClippersError;
use anyhow::Result;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

/// Video extractor backed by the yt-dlp binary
pub struct YtDlpExtractor {
    ytdlp_path: PathBuf,
    timeout: Option<Duration>,
}

impl YtDlpExtractor {
    /// Initialize extractor, locating yt-dlp on this machine
    pub fn new() -> Result<Self> {
        match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                Ok(Self::with_path(path))
            }
            None => {
                error!("yt-dlp not found anywhere!");
                Err(ClippersError::YtDlpNotFound.into())
            }
        }
    }

    /// Use an explicit yt-dlp binary
    pub fn with_path(ytdlp_path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
            timeout: None,
        }
    }

    /// Configured path first, then the usual discovery
    pub fn from_configured(configured: Option<&Path>) -> Result<Self> {
        match configured {
            Some(path) if path.exists() => Ok(Self::with_path(path)),
            Some(path) => {
                error!("Configured yt-dlp does not exist: {}", path.display());
                Err(ClippersError::YtDlpNotFound.into())
            }
            None => Self::new(),
        }
    }

    /// Bound each yt-dlp run; `None` lets it run indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, args: Vec<OsString>) -> Result<Output> {
        debug!("Running {} {:?}", self.ytdlp_path.display(), args);

        let child = AsyncCommand::new(&self.ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output?,
                Err(_) => {
                    warn!("yt-dlp exceeded {:?}, killing it", limit);
                    return Err(ClippersError::ExtractorTimeout(limit).into());
                }
            },
            None => child.wait_with_output().await?,
        };

        Ok(output)
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn id(&self) -> &'static str {
        "ytdlp"
    }

    /// Uses: yt-dlp --dump-json --no-download
    async fn extract_info(&self, url: &str) -> Result<VideoInfo> {
        debug!("Extracting video info for URL: {}", url);

        let output = self.run(info_args(url)).await?;
        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp extraction failed: {}", error_msg.trim());
            return Err(ClippersError::ExtractionError(error_msg.trim().to_string()).into());
        }

        let stdout = String::from_utf8(output.stdout)?;
        parse_first_info(&stdout)
    }

    /// Uses: yt-dlp --dump-json --no-simulate -f <selector> -o <template>
    async fn download(&self, spec: &DownloadSpec) -> Result<VideoInfo> {
        info!("Downloading {} with format {}", spec.url, spec.format_selector);

        let output = self.run(download_args(spec)).await?;
        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp download failed: {}", error_msg.trim());
            return Err(ClippersError::DownloadError(error_msg.trim().to_string()).into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_last_info(&stdout).unwrap_or_else(|| {
            warn!("yt-dlp finished without printable metadata for {}", spec.url);
            VideoInfo::default()
        }))
    }

    async fn version(&self) -> Result<String> {
        let output = self.run(vec!["--version".into()]).await?;
        if !output.status.success() {
            return Err(ClippersError::ExtractionError("yt-dlp --version failed".into()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Arguments for a metadata-only run
pub fn info_args(url: &str) -> Vec<OsString> {
    [
        "--dump-json",
        "--no-download",
        "--no-warnings",
        "--no-check-certificates",
        "--prefer-free-formats",
        "--no-playlist",
        "--extractor-args",
        "youtube:skip=dash",
        "--",
        url,
    ]
    .into_iter()
    .map(OsString::from)
    .collect()
}

/// Arguments for a download run that also prints the final metadata
pub fn download_args(spec: &DownloadSpec) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "--no-playlist",
        "--no-warnings",
        "--no-check-certificates",
        "--no-write-thumbnail",
        "--no-write-info-json",
        "--dump-json",
        "--no-simulate",
        "-f",
        spec.format_selector.as_str(),
        "-o",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();

    args.push(spec.output_template.clone().into_os_string());
    args.push("--".into());
    args.push(spec.url.clone().into());
    args
}

/// First JSON object on stdout; extraction output must parse.
fn parse_first_info(stdout: &str) -> Result<VideoInfo> {
    let line = stdout
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| ClippersError::ExtractionError("yt-dlp printed no metadata".into()))?;
    Ok(serde_json::from_str(line)?)
}

/// Last parsable JSON object on stdout; progress noise is skipped.
fn parse_last_info(stdout: &str) -> Option<VideoInfo> {
    stdout
        .lines()
        .rev()
        .filter(|line| line.trim_start().starts_with('{'))
        .find_map(|line| serde_json::from_str(line).ok())
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find yt-dlp binary with priority:
/// 1. System PATH
/// 2. Common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Some(system) = find_in_path() {
        info!("✓ Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("✓ Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("✗ yt-dlp not found anywhere!");
    None
}

/// Find yt-dlp in system PATH using `which`
fn find_in_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_in_search_path(std::env::var_os("PATH"), &cwd)
}

/// Look up yt-dlp in an explicit PATH-style list of directories
fn find_in_search_path(search_path: Option<OsString>, cwd: &Path) -> Option<PathBuf> {
    which::which_in("yt-dlp", search_path, cwd)
        .ok()
        .filter(|path| path.exists())
}

/// Find yt-dlp in common installation paths
fn find_in_common_paths() -> Option<PathBuf> {
    let common_paths = [
        // macOS Homebrew (Apple Silicon)
        "/opt/homebrew/bin/yt-dlp",
        // macOS Homebrew (Intel)
        "/usr/local/bin/yt-dlp",
        // System
        "/usr/bin/yt-dlp",
        // User local
        "~/.local/bin/yt-dlp",
    ];

    for path_str in common_paths {
        let expanded = match path_str.strip_prefix("~/") {
            Some(rest) => match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            },
            None => PathBuf::from(path_str),
        };

        if expanded.exists() && is_executable(&expanded) {
            return Some(expanded);
        }
    }

    None
}

/// Check if a file is executable
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    // Any executable bit counts
    std::fs::metadata(path)
        .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, just check if file exists
#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.exists()
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[cfg(unix)]
    #[test]
    fn test_find_in_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let empty = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let ytdlp = bin.path().join("yt-dlp");
        std::fs::write(&ytdlp, "#!/bin/sh\necho 2024.01.01\n").unwrap();
        std::fs::set_permissions(&ytdlp, std::fs::Permissions::from_mode(0o755)).unwrap();

        let cwd = empty.path();
        assert_eq!(
            find_in_search_path(Some(empty.path().as_os_str().to_owned()), cwd),
            None
        );

        let search = std::env::join_paths([empty.path(), bin.path()]).unwrap();
        let found = find_in_search_path(Some(search), cwd).unwrap();
        assert_eq!(found.file_name().unwrap(), "yt-dlp");
        assert!(found.starts_with(bin.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_ytdlp_is_skipped() {
        let bin = tempfile::tempdir().unwrap();
        std::fs::write(bin.path().join("yt-dlp"), "not a program").unwrap();

        assert_eq!(
            find_in_search_path(Some(bin.path().as_os_str().to_owned()), bin.path()),
            None
        );
    }

    #[test]
    fn test_info_args_end_with_url_after_separator() {
        let args = strings(&info_args("-https://example.com/v1"));
        let n = args.len();

        assert!(args.contains(&"--dump-json".to_string()));
        assert!(args.contains(&"--no-download".to_string()));
        assert_eq!(args[n - 2], "--");
        assert_eq!(args[n - 1], "-https://example.com/v1");
    }

    #[test]
    fn test_download_args_carry_selector_and_template() {
        let spec = DownloadSpec {
            url: "https://example.com/v1".to_string(),
            format_selector: "22".to_string(),
            output_template: PathBuf::from("/srv/downloads/abc.%(ext)s"),
        };
        let args = strings(&download_args(&spec));

        let f = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f + 1], "22");
        let o = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[o + 1], "/srv/downloads/abc.%(ext)s");
        assert!(args.contains(&"--no-simulate".to_string()));
        assert_eq!(args.last().unwrap(), "https://example.com/v1");
    }

    #[test]
    fn test_parse_first_info_skips_blank_lines() {
        let stdout = "\n{\"title\":\"First\"}\n{\"title\":\"Second\"}\n";
        assert_eq!(parse_first_info(stdout).unwrap().title, "First");
    }

    #[test]
    fn test_parse_first_info_rejects_garbage() {
        assert!(parse_first_info("").is_err());
        assert!(parse_first_info("ERROR: nope").is_err());
    }

    #[test]
    fn test_parse_last_info_ignores_progress_lines() {
        let stdout = "[download] 100% of 1.00MiB\n{\"title\":\"Clip\",\"format\":\"22 - 1280x720\"}\n[Merger] done\n";
        let info = parse_last_info(stdout).unwrap();
        assert_eq!(info.title, "Clip");
        assert_eq!(info.format.as_deref(), Some("22 - 1280x720"));
        assert!(parse_last_info("[download] nothing").is_none());
    }

    #[test]
    fn test_is_executable() {
        let path = PathBuf::from("/bin/ls");
        if path.exists() {
            assert!(is_executable(&path));
        }
    }

    #[tokio::test]
    async fn test_missing_binary_fails_extraction() {
        let extractor = YtDlpExtractor::with_path("/nonexistent/yt-dlp");
        assert!(extractor.extract_info("https://example.com/v1").await.is_err());
    }
}
