/// Default page size for issue listings
pub const DEFAULT_ISSUE_PAGE_SIZE: i64 = 100;

/// Default page size for notification listings
pub const DEFAULT_NOTIFICATION_PAGE_SIZE: i64 = 50;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Length limit of a notification title
pub const NOTIFICATION_TITLE_MAX_CHARS: usize = 200;

// =============================================================================
// IMAGE UPLOADS
// =============================================================================

/// File extensions accepted for issue photos
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Declared content types accepted for issue photos
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Extra request body allowance on the upload route for multipart framing and text fields
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Sub-directory of the upload root holding per-issue photo folders
pub const ISSUE_IMAGE_DIR: &str = "issues";

/// Public route prefix images are served under
pub const IMAGE_ROUTE_PREFIX: &str = "/api/images";
