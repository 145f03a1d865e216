//! `clippers fetch`: one analyze/download round trip from the terminal

use crate::client::api::ApiClient;
use crate::client::display::{display_formats, format_duration, format_file_size, format_label};
use crate::client::session::{ClientSession, Phase};
use crate::utils::paths::default_save_dir;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Format id to download instead of the pre-selected one
    pub format: Option<String>,
    pub download: bool,
    /// `Some(None)` saves into the user's download directory
    pub save_to: Option<Option<PathBuf>>,
    pub cleanup: bool,
}

/// What a fetch left behind locally
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchReport {
    pub download_id: Option<String>,
    pub saved: Option<(PathBuf, u64)>,
    pub cleaned_up: bool,
}

/// Analyze `url`, print the offered qualities and optionally download, save
/// and clean up.
pub async fn fetch(api: &ApiClient, url: &str, options: &FetchOptions) -> Result<FetchReport> {
    let mut session = ClientSession::new();
    session.set_url(url);
    let mut report = FetchReport::default();

    println!("Analyzing...");
    session.analyze(api).await;
    if session.phase() != Phase::InfoShown {
        bail!(session.error().unwrap_or("Analyze failed").to_string());
    }

    if let Some(info) = session.video_info() {
        println!("Title: {}", info.title);
        if let Some(duration) = info.duration {
            println!("Duration: {}", format_duration(duration));
        }
        println!("Available qualities:");
        for format in display_formats(&info.formats) {
            println!("  [{}] {}", format.format_id, format_label(format));
        }
    }

    if let Some(format_id) = &options.format {
        if !session.select_format(format_id) {
            bail!("Unknown format id {format_id}");
        }
    }

    if !options.download {
        return Ok(report);
    }

    println!(
        "Downloading format {}...",
        session.selected_format().unwrap_or("default")
    );
    session.download_selected(api).await;
    if session.phase() != Phase::Complete {
        bail!(session.error().unwrap_or("Download failed").to_string());
    }

    let Some(done) = session.download().cloned() else {
        bail!("Download finished without a result");
    };
    if let Some(link) = session.download_link() {
        println!("Ready: {link}");
    }
    report.download_id = Some(done.download_id.clone());

    if let Some(dest) = &options.save_to {
        let target = save_target(dest.as_deref(), &done.filename);
        let bytes = api.save_file(&done.download_url, &target).await?;
        println!("Saved {} ({})", target.display(), format_file_size(Some(bytes)));
        report.saved = Some((target, bytes));
    }

    if options.cleanup {
        println!("{}", api.cleanup(&done.download_id).await?);
        report.cleaned_up = true;
    }

    Ok(report)
}

/// A directory destination keeps the server's filename
pub fn save_target(dest: Option<&Path>, filename: &str) -> PathBuf {
    match dest {
        None => default_save_dir().join(filename),
        Some(dir) if dir.is_dir() => dir.join(filename),
        Some(file) => file.to_path_buf(),
    }
}
