//! Format filtering and ordering for the info endpoint

use crate::extractor::models::{Format, RawFormat, VideoInfo, VideoSummary};
use std::cmp::Reverse;

/// A codec counts as present unless it is missing, blank or yt-dlp's literal `none`.
fn codec_present(codec: Option<&str>) -> bool {
    matches!(codec.map(str::trim), Some(c) if !c.is_empty() && c != "none")
}

/// True when the format carries both a video and an audio stream
pub fn is_muxed(format: &RawFormat) -> bool {
    codec_present(format.vcodec.as_deref()) && codec_present(format.acodec.as_deref())
}

/// Leading integer of a resolution label: `"1920x1080"` → 1920, `"720p"` → 720.
///
/// Labels without leading digits (including `"audio only"` and missing labels) rank 0.
pub fn resolution_rank(label: Option<&str>) -> u64 {
    let Some(label) = label else { return 0 };
    let digits: String = label
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    // Saturate absurdly long digit runs instead of failing.
    digits.parse().unwrap_or(if digits.is_empty() { 0 } else { u64::MAX })
}

/// Keep muxed formats, reduce them and order by descending resolution.
///
/// The sort is stable, so formats of equal rank keep their extractor order.
pub fn select_formats(raw: &[RawFormat]) -> Vec<Format> {
    let mut formats: Vec<Format> = raw.iter().filter(|f| is_muxed(f)).map(Format::from).collect();
    formats.sort_by_key(|f| Reverse(resolution_rank(f.resolution.as_deref())));
    formats
}

impl VideoSummary {
    pub fn from_info(info: &VideoInfo) -> Self {
        Self {
            title: info.title.clone(),
            duration: info.duration,
            thumbnail: info.thumbnail.clone(),
            formats: select_formats(&info.formats),
        }
    }
}
