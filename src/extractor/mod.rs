pub mod formats;
pub mod models;
pub mod traits;
pub mod ytdlp;

pub use formats::{is_muxed, resolution_rank, select_formats};
pub use models::{DownloadSpec, Format, RawFormat, VideoInfo, VideoSummary};
pub use traits::Extractor;
pub use ytdlp::YtDlpExtractor;
