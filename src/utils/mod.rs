//! Utility modules for error handling and configuration

pub mod config;
pub mod error;
pub mod paths;

// Re-export for convenience
pub use config::{AppSettings, DEFAULT_FORMAT_SELECTOR};
pub use error::ClippersError;
pub use paths::{default_save_dir, resolve_downloads_dir};
