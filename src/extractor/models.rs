//! Data structures for video information

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Video information as printed by `yt-dlp --dump-json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Vec<RawFormat>,
    /// Human readable description of the chosen format (only after a download)
    #[serde(default)]
    pub format: Option<String>,
}

/// One entry of the extractor's `formats` array
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default, deserialize_with = "lenient_size")]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "lenient_size")]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub format_note: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
}

/// Reduced format record returned to clients
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Format {
    pub format_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize_approx: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcodec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acodec: Option<String>,
}

impl From<&RawFormat> for Format {
    fn from(raw: &RawFormat) -> Self {
        Self {
            format_id: raw.format_id.clone(),
            ext: raw.ext.clone(),
            resolution: raw.resolution.clone(),
            filesize: raw.filesize,
            filesize_approx: raw.filesize_approx,
            format_note: raw.format_note.clone(),
            vcodec: raw.vcodec.clone(),
            acodec: raw.acodec.clone(),
        }
    }
}

/// Metadata summary returned by the info endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Vec<Format>,
}

/// Everything yt-dlp needs to perform one download
#[derive(Debug, Clone)]
pub struct DownloadSpec {
    pub url: String,
    /// Value passed to `-f`
    pub format_selector: String,
    /// Value passed to `-o`, e.g. `/srv/downloads/<id>.%(ext)s`
    pub output_template: PathBuf,
}

/// yt-dlp reports sizes as integers, but some extractors emit floats.
fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        v.as_u64()
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
    }))
}
