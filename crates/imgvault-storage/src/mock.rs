//! In-memory storage for tests.

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use imgvault_core::StorageProvider;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Stored object: bytes plus the content type it was uploaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Mock storage implementation that stores files in memory
#[derive(Clone)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, MockObject>>>,
    provider: StorageProvider,
    bucket: String,
    fail_uploads: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::with_provider(StorageProvider::Minio)
    }

    pub fn with_provider(provider: StorageProvider) -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            provider,
            bucket: "images".to_string(),
            fail_uploads: Arc::new(AtomicBool::new(false)),
            fail_deletes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent `put_object` fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `remove_object` fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Set a file in the mock storage
    pub fn set_file(&self, key: &str, data: Vec<u8>) {
        self.files.lock().unwrap().insert(
            key.to_string(),
            MockObject {
                data,
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Check if a file exists in the mock storage
    pub fn has_file(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    /// Get a stored object (for test assertions)
    pub fn get_file(&self, key: &str) -> Option<MockObject> {
        self.files.lock().unwrap().get(key).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put_object(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        validate_key(key)?;
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("mock upload failure".to_string()));
        }
        let data = tokio::fs::read(source).await?;
        let size = data.len() as u64;
        self.files.lock().unwrap().insert(
            key.to_string(),
            MockObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(size)
    }

    async fn remove_object(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("mock delete failure".to_string()));
        }
        // S3 semantics: deleting a missing key succeeds.
        self.files.lock().unwrap().remove(key);
        Ok(())
    }

    async fn object_url(&self, key: &str) -> StorageResult<String> {
        validate_key(key)?;
        Ok(format!("https://storage.example.com/{}/{}", self.bucket, key))
    }

    fn provider(&self) -> StorageProvider {
        self.provider
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
