use crate::bucket_client::BucketClient;
use crate::traits::{Storage, StorageResult};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::Client;
use imgvault_core::{S3Config, StorageProvider};
use std::path::Path;

/// AWS S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    inner: BucketClient,
    region: String,
}

impl S3Storage {
    /// Build a client from static credentials and a region. No network calls are made.
    pub async fn new(config: &S3Config) -> StorageResult<Self> {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "imgvault-s3",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        Ok(S3Storage {
            inner: BucketClient::new(
                Client::new(&sdk_config),
                config.bucket.clone(),
                StorageProvider::S3,
            ),
            region: config.region.clone(),
        })
    }

    /// Public URL: `https://{bucket}.s3.{region}.amazonaws.com/{key}`
    fn generate_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.inner.bucket(),
            self.region,
            key
        )
    }
}

#[async_trait]
impl Storage for S3Storage {
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
        crate::keys::validate_key(key)?;
        Ok(self.generate_url(key))
    }

    fn provider(&self) -> StorageProvider {
        StorageProvider::S3
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;

    fn test_config() -> S3Config {
        S3Config {
            region: "eu-west-1".to_string(),
            access_key: "AKIAEXAMPLE".to_string(),
            secret_key: "secret".to_string(),
            bucket: "photos".to_string(),
        }
    }

    #[tokio::test]
    async fn test_object_url_is_virtual_hosted() {
        let storage = S3Storage::new(&test_config()).await.unwrap();
        let url = storage
            .object_url("0b7c2a1e-5d9f-4f4e-9a51-3c2d1e0f9a8b.png")
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://photos.s3.eu-west-1.amazonaws.com/0b7c2a1e-5d9f-4f4e-9a51-3c2d1e0f9a8b.png"
        );
        assert_eq!(storage.provider(), StorageProvider::S3);
        assert_eq!(storage.bucket(), "photos");
    }

    #[tokio::test]
    async fn test_object_url_rejects_traversal() {
        let storage = S3Storage::new(&test_config()).await.unwrap();
        let result = storage.object_url("../secret.png").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
