pub mod error;
pub mod handlers;
pub mod messages;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use messages::{DownloadRequest, DownloadResponse, DownloadSummary, InfoRequest, MessageResponse};
pub use routes::app_router;
pub use server::{build_service, serve};
pub use state::AppState;
