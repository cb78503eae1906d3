//! MinIO backend.
//!
//! MinIO is reached through the S3 API with path-style addressing. The bucket is
//! created on first start and opened for anonymous reads at that moment only; a
//! policy changed later by an operator is left alone.

use crate::bucket_client::BucketClient;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::Client;
use imgvault_core::constants::MINIO_REGION;
use imgvault_core::{MinioConfig, StorageProvider};
use std::path::Path;

#[derive(Clone)]
pub struct MinioStorage {
    inner: BucketClient,
    public_base_url: String,
    direct_urls: bool,
}

impl MinioStorage {
    /// Build the client. No network calls are made; see [`MinioStorage::ensure_bucket`].
    pub async fn new(config: &MinioConfig) -> StorageResult<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "MINIO_ENDPOINT must not be empty".to_string(),
            ));
        }

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "imgvault-minio",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(MINIO_REGION))
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .endpoint_url(config.endpoint_url())
            .force_path_style(true)
            .build();

        Ok(MinioStorage {
            inner: BucketClient::new(
                Client::from_conf(s3_config),
                config.bucket.clone(),
                StorageProvider::Minio,
            ),
            public_base_url: config.public_base_url(),
            direct_urls: config.direct_urls,
        })
    }

    /// Create the bucket if it does not exist and apply the public-read policy to a
    /// freshly created bucket.
    pub async fn ensure_bucket(&self) -> StorageResult<()> {
        let bucket = self.inner.bucket();
        let client = self.inner.client();

        match client.head_bucket().bucket(bucket).send().await {
            Ok(_) => {
                tracing::debug!(bucket = %bucket, "MinIO bucket already exists");
                return Ok(());
            }
            Err(err) => match err.as_service_error() {
                Some(HeadBucketError::NotFound(_)) => {}
                _ => {
                    return Err(StorageError::BackendError(format!(
                        "Failed to check bucket {}: {}",
                        bucket, err
                    )))
                }
            },
        }

        match client.create_bucket().bucket(bucket).send().await {
            Ok(_) => {
                tracing::info!(bucket = %bucket, region = MINIO_REGION, "MinIO bucket created");
            }
            Err(err) => match err.as_service_error() {
                // Another instance won the race; it applies the policy.
                Some(CreateBucketError::BucketAlreadyOwnedByYou(_)) => {
                    tracing::debug!(bucket = %bucket, "MinIO bucket created concurrently");
                    return Ok(());
                }
                _ => {
                    return Err(StorageError::BackendError(format!(
                        "Failed to create bucket {}: {}",
                        bucket, err
                    )))
                }
            },
        }

        client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(public_read_policy(bucket))
            .send()
            .await
            .map_err(|e| {
                StorageError::BackendError(format!(
                    "Failed to set policy on bucket {}: {}",
                    bucket, e
                ))
            })?;

        tracing::info!(bucket = %bucket, "MinIO public-read policy applied");
        Ok(())
    }

    /// Direct URL: `{scheme}://{endpoint}[:{port}]/{bucket}/{key}`
    fn direct_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.inner.bucket(), key)
    }
}

/// Anonymous `s3:GetObject` on every object in `bucket`.
pub(crate) fn public_read_policy(bucket: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Effect": "Allow",
                "Principal": "*",
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{}/*", bucket)],
            }
        ]
    })
    .to_string()
}

#[async_trait]
impl Storage for MinioStorage {
    async fn put_object(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        self.inner.put_object(key, source, content_type).await
    }

    async fn remove_object(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_object(key).await
    }

    async fn object_url(&self, key: &str) -> StorageResult<String> {
        if self.direct_urls {
            crate::keys::validate_key(key)?;
            Ok(self.direct_url(key))
        } else {
            self.inner.presigned_get_url(key).await
        }
    }

    fn provider(&self) -> StorageProvider {
        StorageProvider::Minio
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }
}
