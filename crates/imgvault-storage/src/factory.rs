use crate::{MinioStorage, S3Storage, Storage, StorageError, StorageProvider, StorageResult};
use imgvault_core::Config;
use std::sync::Arc;

/// Configured backends, keyed by the provider tag they write.
///
/// New uploads always go to the active backend. Deletes look up the backend named
/// by the row, which may be a secondary one when the active provider has changed
/// since the image was stored.
#[derive(Clone)]
pub struct StorageSet {
    active: Arc<dyn Storage>,
    secondary: Vec<Arc<dyn Storage>>,
}

impl StorageSet {
    pub fn new(active: Arc<dyn Storage>) -> Self {
        Self {
            active,
            secondary: Vec::new(),
        }
    }

    /// Register an additional backend for routing. A backend with the same provider
    /// as the active one is ignored.
    pub fn with_backend(mut self, storage: Arc<dyn Storage>) -> Self {
        let provider = storage.provider();
        if provider != self.active.provider() {
            self.secondary.retain(|s| s.provider() != provider);
            self.secondary.push(storage);
        }
        self
    }

    /// Backend receiving new uploads.
    pub fn active(&self) -> &Arc<dyn Storage> {
        &self.active
    }

    pub fn active_provider(&self) -> StorageProvider {
        self.active.provider()
    }

    /// Backend for objects tagged with `provider`.
    pub fn for_provider(&self, provider: StorageProvider) -> StorageResult<&Arc<dyn Storage>> {
        if self.active.provider() == provider {
            return Ok(&self.active);
        }
        self.secondary
            .iter()
            .find(|s| s.provider() == provider)
            .ok_or_else(|| {
                StorageError::ConfigError(format!(
                    "Storage provider '{}' is not configured",
                    provider
                ))
            })
    }
}

/// Build the storage backends from configuration.
///
/// The active provider must be fully configured; for MinIO its bucket is created
/// here if missing. The other provider is added for delete routing when its
/// settings are present.
pub async fn create_storage_set(config: &Config) -> StorageResult<StorageSet> {
    let minio = match config.minio() {
        Some(minio_config) => Some(MinioStorage::new(minio_config).await?),
        None => None,
    };
    let s3 = match config.s3() {
        Some(s3_config) => Some(S3Storage::new(s3_config).await?),
        None => None,
    };

    let set = match config.storage_provider() {
        StorageProvider::Minio => {
            let minio = minio.ok_or_else(|| {
                StorageError::ConfigError("MinIO storage is not configured".to_string())
            })?;
            minio.ensure_bucket().await?;
            let mut set = StorageSet::new(Arc::new(minio));
            if let Some(s3) = s3 {
                set = set.with_backend(Arc::new(s3));
            }
            set
        }
        StorageProvider::S3 => {
            let s3 = s3.ok_or_else(|| {
                StorageError::ConfigError("S3 storage is not configured".to_string())
            })?;
            let mut set = StorageSet::new(Arc::new(s3));
            if let Some(minio) = minio {
                set = set.with_backend(Arc::new(minio));
            }
            set
        }
    };

    tracing::info!(
        provider = %set.active_provider(),
        bucket = %set.active().bucket(),
        "Storage initialized"
    );

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockStorage;

    #[test]
    fn test_routes_to_active_provider() {
        let set = StorageSet::new(Arc::new(MockStorage::with_provider(StorageProvider::Minio)));
        assert_eq!(set.active_provider(), StorageProvider::Minio);
        assert!(set.for_provider(StorageProvider::Minio).is_ok());
    }

    #[test]
    fn test_unconfigured_provider_is_config_error() {
        let set = StorageSet::new(Arc::new(MockStorage::with_provider(StorageProvider::Minio)));
        assert!(matches!(
            set.for_provider(StorageProvider::S3),
            Err(StorageError::ConfigError(_))
        ));
    }

    #[test]
    fn test_routes_to_secondary_provider() {
        let s3 = Arc::new(MockStorage::with_provider(StorageProvider::S3));
        let set = StorageSet::new(Arc::new(MockStorage::with_provider(StorageProvider::Minio)))
            .with_backend(s3);
        let backend = set.for_provider(StorageProvider::S3).unwrap();
        assert_eq!(backend.provider(), StorageProvider::S3);
        assert_eq!(set.active_provider(), StorageProvider::Minio);
    }

    #[test]
    fn test_duplicate_active_provider_ignored() {
        let set = StorageSet::new(Arc::new(MockStorage::with_provider(StorageProvider::Minio)))
            .with_backend(Arc::new(MockStorage::with_provider(StorageProvider::Minio)));
        assert!(set.secondary.is_empty());
    }

    #[tokio::test]
    async fn test_mock_round_trip_through_set() {
        let mock = MockStorage::new();
        let set = StorageSet::new(Arc::new(mock.clone()));

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"png-bytes").unwrap();

        let backend = set.for_provider(StorageProvider::Minio).unwrap();
        backend
            .put_object("abc.png", file.path(), "image/png")
            .await
            .unwrap();
        assert_eq!(mock.get_file("abc.png").unwrap().content_type, "image/png");

        backend.remove_object("abc.png").await.unwrap();
        assert!(!mock.has_file("abc.png"));
    }
}
