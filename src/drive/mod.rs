//! Photo blob storage
//!
//! Photos live under a directory prefix (`photos/`) of either the local public
//! disk or an S3 bucket. Both expose the same [`ImageStore`] operations.

pub mod local;
#[cfg(feature = "drive")]
pub mod s3;

use crate::core::config::StorageConfig;
use async_trait::async_trait;
use std::sync::Arc;

pub use local::LocalStore;
#[cfg(feature = "drive")]
pub use s3::S3Store;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Paths of the files directly under `directory`, sorted by name.
    async fn files(&self, directory: &str) -> Result<Vec<String>, StorageError>;

    /// Removes the directory and everything in it. A missing directory is not an error.
    async fn delete_directory(&self, directory: &str) -> Result<(), StorageError>;

    /// Public URL a browser can load the file from.
    fn url(&self, path: &str) -> String;
}

/// Rejects absolute paths and parent-directory components.
pub(crate) fn validate_path(path: &str) -> Result<&str, StorageError> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty()
        || path.starts_with('/')
        || trimmed
            .split('/')
            .any(|part| part.is_empty() || part == "." || part == "..")
    {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(trimmed)
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub async fn build_image_store(config: &StorageConfig) -> Result<Arc<dyn ImageStore>, StorageError> {
    match config {
        StorageConfig::Local(local) => Ok(Arc::new(LocalStore::new(
            local.root.clone(),
            local.public_url.clone(),
        ))),
        #[cfg(feature = "drive")]
        StorageConfig::S3(drive) => Ok(Arc::new(S3Store::new(drive).await)),
        #[cfg(not(feature = "drive"))]
        StorageConfig::S3(_) => Err(StorageError::Backend(
            "S3 storage requires the `drive` feature".to_string(),
        )),
    }
}
