//! Local filesystem storage for issue photos
//!
//! Files live under `{root}/issues/{issue_id}/{uuid}.{ext}`. Only the
//! relative part is ever persisted; absolute paths are resolved here, at the
//! read boundary, and checked against the storage root.

use std::path::{Component, Path, PathBuf};

use image::ImageFormat;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::AppError;
use crate::shared::constants::{
    ALLOWED_IMAGE_EXTENSIONS, ALLOWED_IMAGE_MIME_TYPES, IMAGE_ROUTE_PREFIX, ISSUE_IMAGE_DIR,
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file type. Allowed types: {0}")]
    InvalidExtension(String),

    #[error("Invalid file content type. Only images are allowed.")]
    InvalidContentType,

    #[error("File too large. Maximum size: {0:.1}MB")]
    TooLarge(f64),

    #[error("File content does not match a {0} image")]
    FormatMismatch(String),

    #[error("Error processing image: {0}")]
    Corrupt(String),

    #[error("Invalid file path")]
    InvalidPath,

    #[error("Access denied")]
    AccessDenied,

    #[error("Image not found")]
    NotFound,

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidPath => AppError::BadRequest(err.to_string()),
            StorageError::AccessDenied => AppError::Forbidden(err.to_string()),
            StorageError::NotFound => AppError::NotFound(err.to_string()),
            StorageError::Io(e) => AppError::Internal(format!("Storage I/O error: {}", e)),
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// Filesystem-backed photo storage rooted at the configured upload directory
pub struct ImageStore {
    root: PathBuf,
    max_file_size: usize,
}

impl ImageStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.upload_dir.clone(),
            max_file_size: config.max_file_size,
        }
    }

    /// Create the upload root if it does not exist yet
    pub async fn ensure_root_exists(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Validate, verify and store an uploaded photo for an issue.
    ///
    /// Nothing touches the filesystem until the payload has passed every
    /// check. Returns the path relative to the storage root.
    pub async fn save(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
        issue_id: i64,
    ) -> Result<String, StorageError> {
        let extension = Self::validate_extension(filename)?;
        Self::validate_content_type(content_type)?;

        if data.len() > self.max_file_size {
            return Err(StorageError::TooLarge(
                self.max_file_size as f64 / 1024.0 / 1024.0,
            ));
        }

        let data = Self::verify_image(data, &extension).await?;

        let issue_dir = self.root.join(ISSUE_IMAGE_DIR).join(issue_id.to_string());
        tokio::fs::create_dir_all(&issue_dir).await?;

        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
        let file_path = issue_dir.join(&stored_name);

        if let Err(e) = tokio::fs::write(&file_path, &data).await {
            if let Err(cleanup) = tokio::fs::remove_file(&file_path).await {
                debug!("No partial file to clean up at {:?}: {}", file_path, cleanup);
            }
            return Err(StorageError::Io(e));
        }

        let relative = format!("{}/{}/{}", ISSUE_IMAGE_DIR, issue_id, stored_name);
        info!(
            "Image stored: issue_id={}, path={}, size={}",
            issue_id,
            relative,
            data.len()
        );

        Ok(relative)
    }

    /// Remove a stored photo. Missing files are not an error.
    ///
    /// The per-issue directory is removed as well once it is empty.
    pub async fn delete(&self, relative_path: &str) -> Result<(), StorageError> {
        if relative_path.is_empty() {
            return Ok(());
        }

        Self::validate_relative(relative_path)?;
        let file_path = self.root.join(relative_path);

        match tokio::fs::remove_file(&file_path).await {
            Ok(()) => {
                debug!("Image deleted: {}", relative_path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Image already absent: {}", relative_path);
                return Ok(());
            }
            Err(e) => return Err(StorageError::Io(e)),
        }

        if let Some(parent) = file_path.parent() {
            if parent != self.root && Self::is_empty_dir(parent).await {
                if let Err(e) = tokio::fs::remove_dir(parent).await {
                    warn!("Failed to remove empty image directory {:?}: {}", parent, e);
                }
            }
        }

        Ok(())
    }

    /// Resolve a client-supplied relative path to a file inside the root
    pub async fn resolve_read_path(&self, relative_path: &str) -> Result<PathBuf, StorageError> {
        Self::validate_relative(relative_path)?;

        let root = tokio::fs::canonicalize(&self.root).await?;
        let resolved = match tokio::fs::canonicalize(self.root.join(relative_path)).await {
            Ok(path) => path,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound)
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        if !resolved.starts_with(&root) {
            warn!(
                "Rejected image path escaping upload root: {}",
                relative_path
            );
            return Err(StorageError::AccessDenied);
        }

        let metadata = tokio::fs::metadata(&resolved).await?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound);
        }

        Ok(resolved)
    }

    fn validate_extension(filename: &str) -> Result<String, StorageError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        if ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Ok(extension)
        } else {
            Err(StorageError::InvalidExtension(
                ALLOWED_IMAGE_EXTENSIONS.join(", "),
            ))
        }
    }

    fn validate_content_type(content_type: &str) -> Result<(), StorageError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if ALLOWED_IMAGE_MIME_TYPES.contains(&essence.as_str()) {
            Ok(())
        } else {
            Err(StorageError::InvalidContentType)
        }
    }

    /// Sniff the payload, check it against the extension, then fully decode it
    async fn verify_image(data: Vec<u8>, extension: &str) -> Result<Vec<u8>, StorageError> {
        let expected = match extension {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            _ => ImageFormat::Gif,
        };

        match image::guess_format(&data) {
            Ok(format) if format == expected => {}
            _ => return Err(StorageError::FormatMismatch(extension.to_uppercase())),
        }

        // Decoding is CPU bound
        tokio::task::spawn_blocking(move || {
            image::load_from_memory_with_format(&data, expected)
                .map(|_| data)
                .map_err(|e| StorageError::Corrupt(e.to_string()))
        })
        .await
        .map_err(|e| StorageError::Corrupt(e.to_string()))?
    }

    fn validate_relative(relative_path: &str) -> Result<(), StorageError> {
        if relative_path.is_empty()
            || relative_path.starts_with('/')
            || relative_path.starts_with('\\')
            || relative_path.split(['/', '\\']).any(|segment| segment == "..")
        {
            return Err(StorageError::InvalidPath);
        }

        let only_normal = Path::new(relative_path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !only_normal {
            return Err(StorageError::InvalidPath);
        }

        Ok(())
    }

    async fn is_empty_dir(dir: &Path) -> bool {
        match tokio::fs::read_dir(dir).await {
            Ok(mut entries) => matches!(entries.next_entry().await, Ok(None)),
            Err(_) => false,
        }
    }
}

/// Turn a stored relative path into a URL the client can fetch.
///
/// Returns `None` for an empty path.
pub fn resolve_url(image_path: &str, base_url: Option<&str>) -> Option<String> {
    if image_path.is_empty() {
        return None;
    }

    match base_url
        .map(|b| b.trim_end_matches('/'))
        .filter(|b| !b.is_empty())
    {
        Some(base) => Some(format!("{}{}/{}", base, IMAGE_ROUTE_PREFIX, image_path)),
        None => Some(format!("{}/{}", IMAGE_ROUTE_PREFIX, image_path)),
    }
}
