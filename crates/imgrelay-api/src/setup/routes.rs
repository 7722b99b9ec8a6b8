//! Route and middleware assembly

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
///
/// The body-size ceiling is applied with axum's `DefaultBodyLimit` so an
/// oversized body surfaces through the multipart read inside the handler and
/// maps onto the 400 client-error channel.
pub fn setup_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/upload", post(handlers::upload_files))
        .route("/images", get(handlers::list_images))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
