//! Client side of Clippers: API client, session state and display helpers

pub mod api;
pub mod display;
pub mod fetch;
pub mod session;

pub use api::ApiClient;
pub use display::{display_formats, format_duration, format_file_size, format_label};
pub use fetch::{fetch, save_target, FetchOptions, FetchReport};
pub use session::{ClientSession, Phase};
