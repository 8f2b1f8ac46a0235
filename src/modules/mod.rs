//! Modules layer - Infrastructure components shared by features
//!
//! Currently holds the local filesystem storage for issue photos.

pub mod storage;
