//! Presentation helpers for the client

use crate::extractor::Format;

/// Resolutions offered first, in order
const PREFERRED_RESOLUTIONS: [&str; 3] = ["1080", "720", "480"];

/// Narrow the server's list to one format per preferred resolution.
///
/// Picks the first format whose resolution label contains 1080, 720 and 480
/// respectively; if none match, the first three formats are shown instead.
pub fn display_formats(formats: &[Format]) -> Vec<&Format> {
    let mut picked: Vec<&Format> = Vec::new();

    for resolution in PREFERRED_RESOLUTIONS {
        let found = formats
            .iter()
            .find(|f| f.resolution.as_deref().unwrap_or("").contains(resolution));
        if let Some(format) = found {
            if !picked.iter().any(|p| p.format_id == format.format_id) {
                picked.push(format);
            }
        }
    }

    if picked.is_empty() {
        formats.iter().take(3).collect()
    } else {
        picked
    }
}

/// `h:mm:ss` when at least an hour long, `m:ss` otherwise
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Human readable size with up to two decimals, e.g. `1.5 MB`
pub fn format_file_size(bytes: Option<u64>) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let bytes = match bytes {
        Some(b) if b > 0 => b as f64,
        _ => return "Unknown size".to_string(),
    };

    let exponent = ((bytes.ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let scaled = (bytes / 1024f64.powi(exponent as i32) * 100.0).round() / 100.0;
    format!("{} {}", scaled, UNITS[exponent])
}

/// One line per format, as listed in the terminal front end
pub fn format_label(format: &Format) -> String {
    let resolution = format.resolution.as_deref().unwrap_or("Audio");
    let ext = format.ext.as_deref().unwrap_or("?").to_uppercase();
    match format.filesize {
        Some(size) if size > 0 => format!("{resolution} - {ext} - {}", format_file_size(Some(size))),
        _ => format!("{resolution} - {ext}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(id: &str, resolution: &str) -> Format {
        Format {
            format_id: id.to_string(),
            ext: Some("mp4".to_string()),
            resolution: Some(resolution.to_string()),
            ..Default::default()
        }
    }

    fn ids(formats: Vec<&Format>) -> Vec<&str> {
        formats.into_iter().map(|f| f.format_id.as_str()).collect()
    }

    #[test]
    fn test_display_formats_picks_preferred_resolutions() {
        let formats = vec![
            format("a", "1920x1080"),
            format("b", "1920x1080"),
            format("c", "1280x720"),
            format("d", "640x360"),
            format("e", "854x480"),
        ];
        assert_eq!(ids(display_formats(&formats)), vec!["a", "c", "e"]);
    }

    #[test]
    fn test_display_formats_keeps_partial_matches() {
        let formats = vec![format("a", "1280x720"), format("b", "640x360")];
        assert_eq!(ids(display_formats(&formats)), vec!["a"]);
    }

    #[test]
    fn test_display_formats_falls_back_to_first_three() {
        let formats = vec![
            format("a", "640x360"),
            format("b", "426x240"),
            format("c", "256x144"),
            format("d", "audio only"),
        ];
        assert_eq!(ids(display_formats(&formats)), vec!["a", "b", "c"]);
        assert!(display_formats(&[]).is_empty());
    }

    #[test]
    fn test_display_formats_dedupes_same_format() {
        // "1080x720" contains both 1080 and 720
        let formats = vec![format("a", "1080x720")];
        assert_eq!(ids(display_formats(&formats)), vec!["a"]);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(65.9), "1:05");
        assert_eq!(format_duration(3600.0), "1:00:00");
        assert_eq!(format_duration(3725.0), "1:02:05");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(None), "Unknown size");
        assert_eq!(format_file_size(Some(0)), "Unknown size");
        assert_eq!(format_file_size(Some(512)), "512 B");
        assert_eq!(format_file_size(Some(1536)), "1.5 KB");
        assert_eq!(format_file_size(Some(5 * 1024 * 1024)), "5 MB");
        assert_eq!(format_file_size(Some(3 * 1024 * 1024 * 1024 * 1024)), "3072 GB");
    }

    #[test]
    fn test_format_label() {
        let mut f = format("a", "1280x720");
        assert_eq!(format_label(&f), "1280x720 - MP4");
        f.filesize = Some(2048);
        assert_eq!(format_label(&f), "1280x720 - MP4 - 2 KB");
    }
}
