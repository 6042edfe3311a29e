use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize;

    Router::new()
        // Auth
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        // Waitlist
        .route("/api/waitlist", get(handlers::list_waitlist))
        .route("/api/waitlist", post(handlers::join_waitlist))
        .route("/api/waitlist/:id", delete(handlers::delete_waitlist_entry))
        // Folders
        .route("/api/folders", get(handlers::list_folders))
        .route("/api/folders", post(handlers::create_folder))
        .route("/api/folders/:id", patch(handlers::update_folder))
        .route("/api/folders/:id", delete(handlers::delete_folder))
        // Files
        .route("/api/files", get(handlers::list_files))
        .route(
            "/api/files",
            post(handlers::upload_files).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/files/download-all", get(handlers::download_all))
        .route("/api/files/:id/download", get(handlers::download_file))
        .route("/api/files/:id", delete(handlers::delete_file))
        // Internal
        .route("/_internal/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
