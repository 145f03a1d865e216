pub mod gate;
pub mod job;
pub mod service;
pub mod settle;
pub mod store;

pub use gate::AdmissionGate;
pub use job::DownloadJob;
pub use service::{CompletedDownload, DownloadService};
pub use settle::{wait_for_media, SettlePolicy};
pub use store::{is_sidecar, DownloadsDir, StoredFile};
