//! Download job identity and yt-dlp output naming

use crate::extractor::DownloadSpec;
use crate::utils::error::ClippersError;
use anyhow::Result;
use std::path::Path;
use uuid::Uuid;

const MAX_FORMAT_ID_LEN: usize = 256;

/// One download request: a fresh identifier plus what to ask yt-dlp for
///
/// The identifier is the file name stem of every file the job produces and
/// the only link between the request and those files.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub id: String,
    pub spec: DownloadSpec,
}

impl DownloadJob {
    /// Create a job writing into `downloads_dir`.
    ///
    /// `format_id` wins over `default_selector` when present and non-blank.
    pub fn new(
        url: &str,
        format_id: Option<&str>,
        default_selector: &str,
        downloads_dir: &Path,
    ) -> Result<Self> {
        let format_selector = match format_id.map(str::trim).filter(|f| !f.is_empty()) {
            Some(format_id) => {
                validate_format_id(format_id)?;
                format_id.to_string()
            }
            None => default_selector.to_string(),
        };

        let id = Uuid::new_v4().to_string();
        let output_template = downloads_dir.join(format!("{id}.%(ext)s"));
        let output_template = escape_template_dir(downloads_dir, &output_template);

        Ok(Self {
            spec: DownloadSpec {
                url: url.to_string(),
                format_selector,
                output_template: output_template.into(),
            },
            id,
        })
    }
}

/// Client supplied selectors are trusted as yt-dlp syntax but must not look
/// like an option or carry control characters.
pub fn validate_format_id(format_id: &str) -> Result<()> {
    let invalid = format_id.is_empty()
        || format_id.len() > MAX_FORMAT_ID_LEN
        || format_id.starts_with('-')
        || format_id.chars().any(char::is_control);

    if invalid {
        return Err(ClippersError::InvalidFormat(format_id.to_string()).into());
    }
    Ok(())
}

/// yt-dlp treats `%` in `-o` as a template field, so the directory part is escaped.
fn escape_template_dir(dir: &Path, template: &Path) -> String {
    let dir_str = dir.to_string_lossy();
    let template_str = template.to_string_lossy();
    match template_str.strip_prefix(dir_str.as_ref()) {
        Some(rest) => format!("{}{}", dir_str.replace('%', "%%"), rest),
        None => template_str.into_owned(),
    }
}
