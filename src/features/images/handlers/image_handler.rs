use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::core::error::{AppError, Result};
use crate::modules::storage::ImageStore;

/// Serve a stored issue photo
///
/// The path is relative to the upload root, as found in an issue's `image_url`.
/// Paths escaping the upload root are rejected.
#[utoipa::path(
    get,
    path = "/api/images/{path}",
    params(
        ("path" = String, Path, description = "Stored image path, e.g. issues/5/{uuid}.png")
    ),
    responses(
        (status = 200, description = "Image bytes with a guessed content type"),
        (status = 400, description = "Invalid file path"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn get_image(
    State(store): State<Arc<ImageStore>>,
    Path(path): Path<String>,
    request: Request,
) -> Result<Response> {
    let file = store.resolve_read_path(&path).await?;

    let response = ServeFile::new(file)
        .oneshot(request)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to serve image: {}", e)))?;

    Ok(response.into_response())
}
