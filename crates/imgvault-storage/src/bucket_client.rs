//! Object operations shared by the S3 and MinIO backends.
//!
//! Both backends speak the S3 API; they differ only in how the client is built,
//! how URLs are derived, and whether the bucket is bootstrapped at startup.

use crate::keys::validate_key;
use crate::{StorageError, StorageResult};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use imgvault_core::constants::{OBJECT_CACHE_CONTROL, PRESIGNED_URL_EXPIRY_SECS};
use imgvault_core::StorageProvider;
use std::path::Path;
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct BucketClient {
    client: Client,
    bucket: String,
    provider: StorageProvider,
}

impl BucketClient {
    pub fn new(client: Client, bucket: String, provider: StorageProvider) -> Self {
        Self {
            client,
            bucket,
            provider,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn put_object(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        validate_key(key)?;

        let size = tokio::fs::metadata(source).await?.len();
        let body = ByteStream::from_path(source).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to open {} for upload: {}",
                source.display(),
                e
            ))
        })?;

        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_length(size as i64)
            .content_type(content_type)
            .cache_control(OBJECT_CACHE_CONTROL)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    provider = %self.provider,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            provider = %self.provider,
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(size)
    }

    pub async fn remove_object(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let start = std::time::Instant::now();

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    provider = %self.provider,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object delete failed"
                );
                StorageError::DeleteFailed(e.to_string())
            })?;

        tracing::info!(
            provider = %self.provider,
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object delete successful"
        );

        Ok(())
    }

    /// Presigned GET URL valid for seven days.
    pub async fn presigned_get_url(&self, key: &str) -> StorageResult<String> {
        validate_key(key)?;

        let presigning_config =
            PresigningConfig::expires_in(Duration::from_secs(PRESIGNED_URL_EXPIRY_SECS))
                .map_err(|e| StorageError::BackendError(e.to_string()))?;

        let presigned_request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        Ok(presigned_request.uri().to_string())
    }
}
