use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::images::handlers;
use crate::modules::storage::ImageStore;

/// Create routes for serving stored photos
///
/// Note: These routes are public so image URLs work in plain `<img>` tags.
pub fn routes(store: Arc<ImageStore>) -> Router {
    Router::new()
        .route("/api/images/{*path}", get(handlers::get_image))
        .with_state(store)
}
