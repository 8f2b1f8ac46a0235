use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::features::issues::handlers;
use crate::features::issues::services::IssueService;
use crate::shared::constants::MULTIPART_OVERHEAD_BYTES;

/// Shared state of the issue routes
#[derive(Clone)]
pub struct IssueState {
    pub service: Arc<IssueService>,
    /// Configured external base URL for image links, preferred over the request's Host
    pub public_base_url: Option<String>,
}

/// Routes that change issues (require authentication)
///
/// Only the upload route gets a body limit sized for one photo plus the text fields.
pub fn protected_routes(state: IssueState) -> Router {
    let upload_limit = state.service.max_image_size() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route(
            "/api/issues",
            post(handlers::create_issue).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/issues/{id}",
            patch(handlers::update_issue).delete(handlers::delete_issue),
        )
        .route("/api/issues/{id}/status", put(handlers::set_issue_status))
        .with_state(state)
}

/// Read-only issue routes (no auth required)
pub fn public_routes(state: IssueState) -> Router {
    Router::new()
        .route("/api/issues", get(handlers::list_issues))
        .route("/api/issues/{id}", get(handlers::get_issue))
        .with_state(state)
}
