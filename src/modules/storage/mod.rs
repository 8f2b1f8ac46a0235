//! Storage module for issue photos
//!
//! Validates uploads, stores them under the configured upload directory,
//! resolves stored paths safely for reading and turns them into URLs.

mod image_store;

pub use image_store::{resolve_url, ImageStore, StorageError};
