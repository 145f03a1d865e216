use crate::backend::handlers;
use crate::backend::state::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Full application router: JSON API plus the downloads directory under `/downloads`
pub fn app_router(state: AppState) -> Router {
    let downloads = ServeDir::new(state.service.store().root());

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/video-info", post(handlers::video_info))
        .route("/api/download", post(handlers::download))
        .route("/api/downloads/{download_id}", delete(handlers::cleanup))
        .nest_service("/downloads", downloads)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
