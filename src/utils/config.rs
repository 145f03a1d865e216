//! Application configuration

use crate::utils::error::ClippersError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Format selector used when the caller does not pick one
pub const DEFAULT_FORMAT_SELECTOR: &str =
    "best[vcodec!=none][acodec!=none][ext=mp4][filesize<1G]/best[ext=mp4]";

/// Upper bound for the admission and settle waits
const MAX_WAIT_SECS: u64 = 24 * 60 * 60;

/// Upper bound for the settle poll interval
const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Upper bound for a single yt-dlp run
const MAX_EXTRACTOR_TIMEOUT_SECS: u64 = 7 * 24 * 60 * 60;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Interface the HTTP server binds to
    pub host: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Directory holding downloaded files, served under `/downloads`
    pub downloads_dir: PathBuf,

    /// Base URL the client talks to
    pub api_base_url: String,

    /// Explicit yt-dlp binary, auto-detected when unset
    pub ytdlp_path: Option<PathBuf>,

    /// Selector passed to `-f` when the request carries no format id
    pub default_format: String,

    /// Maximum number of yt-dlp downloads running at once
    pub max_concurrent_downloads: usize,

    /// How long a download request may queue for a free slot
    pub admission_wait_secs: u64,

    /// Interval between directory scans while a download settles
    pub settle_poll_interval_ms: u64,

    /// Upper bound on waiting for the downloaded file to settle
    pub settle_timeout_secs: u64,

    /// Upper bound on a single yt-dlp run (0 disables)
    pub extractor_timeout_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            downloads_dir: PathBuf::from("downloads"),
            api_base_url: "http://localhost:5000".to_string(),
            ytdlp_path: None,
            default_format: DEFAULT_FORMAT_SELECTOR.to_string(),
            max_concurrent_downloads: 3,
            admission_wait_secs: 30,
            settle_poll_interval_ms: 250,
            settle_timeout_secs: 30,
            extractor_timeout_secs: 3600,
        }
    }
}

impl AppSettings {
    /// Load settings: defaults, then the JSON file (if any), then the environment
    ///
    /// Variables from a `.env` file in the working directory apply where the
    /// process environment does not set them.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut settings = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        let dotenv = read_dotenv(Path::new(".env"))?;
        settings.apply_env(|key| std::env::var(key).ok().or_else(|| dotenv.get(key).cloned()));
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading settings from {}", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(settings)
    }

    /// Apply environment overrides through `lookup`
    ///
    /// Unparsable numeric values are ignored with a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty("HOST") {
            self.host = host;
        }
        if let Some(port) = non_empty("PORT") {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring invalid PORT value {:?}", port),
            }
        }
        if let Some(dir) = non_empty("DOWNLOADS_DIR") {
            self.downloads_dir = PathBuf::from(dir);
        }
        if let Some(url) = non_empty("CLIPPERS_API_URL") {
            self.api_base_url = url;
        }
        if let Some(path) = non_empty("YTDLP_PATH") {
            self.ytdlp_path = Some(PathBuf::from(path));
        }
        if let Some(max) = non_empty("MAX_CONCURRENT_DOWNLOADS") {
            match max.trim().parse() {
                Ok(max) => self.max_concurrent_downloads = max,
                Err(_) => warn!("Ignoring invalid MAX_CONCURRENT_DOWNLOADS value {:?}", max),
            }
        }
    }

    /// Enforce sane minimums and clamp durations to their upper bounds
    pub fn validate(&mut self) -> Result<()> {
        if self.max_concurrent_downloads == 0 {
            warn!("max_concurrent_downloads must be at least 1, using 1");
            self.max_concurrent_downloads = 1;
        }
        if self.settle_poll_interval_ms == 0 {
            self.settle_poll_interval_ms = 1;
        }
        clamp_setting("settle_poll_interval_ms", &mut self.settle_poll_interval_ms, MAX_POLL_INTERVAL_MS);
        clamp_setting("settle_timeout_secs", &mut self.settle_timeout_secs, MAX_WAIT_SECS);
        clamp_setting("admission_wait_secs", &mut self.admission_wait_secs, MAX_WAIT_SECS);
        clamp_setting(
            "extractor_timeout_secs",
            &mut self.extractor_timeout_secs,
            MAX_EXTRACTOR_TIMEOUT_SECS,
        );
        if self.default_format.trim().is_empty() {
            return Err(ClippersError::ConfigError("default_format must not be blank".into()).into());
        }
        Ok(())
    }

    pub fn admission_wait(&self) -> Duration {
        Duration::from_secs(self.admission_wait_secs)
    }

    pub fn settle_poll_interval(&self) -> Duration {
        Duration::from_millis(self.settle_poll_interval_ms)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_timeout_secs)
    }

    /// `None` when the extractor timeout is disabled
    pub fn extractor_timeout(&self) -> Option<Duration> {
        (self.extractor_timeout_secs > 0).then(|| Duration::from_secs(self.extractor_timeout_secs))
    }
}

/// Variables of a `.env` file; a missing file yields none
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => {
            debug!("Loading environment from {}", path.display());
            Ok(parse_dotenv(&raw))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// `KEY=VALUE` lines; blank lines, `#` comments and an `export ` prefix are
/// allowed, and matching outer quotes are stripped from values.
fn parse_dotenv(raw: &str) -> HashMap<String, String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = ['"', '\'']
                .iter()
                .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)))
                .unwrap_or(value);
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

fn clamp_setting(name: &str, value: &mut u64, max: u64) {
    if *value > max {
        warn!("{} = {} is too large, using {}", name, value, max);
        *value = max;
    }
}

/// `<config dir>/clippers/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("clippers").join("config.json"))
}
