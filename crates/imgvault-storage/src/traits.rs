//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use imgvault_core::{AppError, StorageProvider};
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::DeleteFailed(msg) => AppError::Storage(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Object store holding image bytes.
///
/// Implementations are long-lived and shared across requests, so they must be
/// safe for concurrent use.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream the file at `source` to `key`, tagging it with `content_type` and a
    /// one-year `Cache-Control`. Returns the number of bytes sent.
    async fn put_object(&self, key: &str, source: &Path, content_type: &str)
        -> StorageResult<u64>;

    /// Delete the object at `key`.
    async fn remove_object(&self, key: &str) -> StorageResult<()>;

    /// URL clients use to fetch `key`: either a deterministic public URL or a
    /// presigned GET URL, depending on the backend's policy.
    async fn object_url(&self, key: &str) -> StorageResult<String>;

    /// Tag persisted alongside objects written by this backend.
    fn provider(&self) -> StorageProvider;

    /// Bucket this backend writes to.
    fn bucket(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_upload_failed() {
        let app_err: AppError = StorageError::UploadFailed("Upload failed".to_string()).into();
        match app_err {
            AppError::Storage(msg) => assert_eq!(msg, "Upload failed"),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let app_err: AppError = StorageError::InvalidKey("Invalid key".to_string()).into();
        assert!(matches!(app_err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_from_storage_error_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "IO error");
        let app_err: AppError = StorageError::IoError(io_err).into();
        match app_err {
            AppError::Internal(msg) => assert!(msg.contains("IO error")),
            _ => panic!("Expected Internal variant"),
        }
    }

    #[test]
    fn test_from_storage_error_config_error() {
        let app_err: AppError =
            StorageError::ConfigError("Storage provider 's3' is not configured".to_string())
                .into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
