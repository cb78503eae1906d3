//! In-memory repository for tests.

use crate::image::ImageRepository;
use async_trait::async_trait;
use chrono::Utc;
use imgvault_core::{AppError, Image, NewImage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// `HashMap`-backed [`ImageRepository`] mirroring the table's unique constraints.
#[derive(Clone, Default)]
pub struct InMemoryImageRepository {
    images: Arc<Mutex<HashMap<Uuid, Image>>>,
    fail_inserts: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `insert` fail with a database error.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete` fail with a database error.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.images.lock().unwrap().contains_key(&id)
    }

    /// Seed a row directly, bypassing the failure switches.
    pub fn put(&self, image: Image) {
        self.images.lock().unwrap().insert(image.id, image);
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn insert(&self, image: NewImage) -> Result<Image, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::from(sqlx::Error::PoolTimedOut));
        }

        let mut images = self.images.lock().unwrap();
        if images.contains_key(&image.id) || images.values().any(|i| i.filename == image.filename)
        {
            return Err(AppError::from(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint".to_string(),
            )));
        }

        let now = Utc::now();
        let stored = Image {
            id: image.id,
            filename: image.filename,
            url: image.url,
            description: image.description,
            original_name: image.original_name,
            mime_type: image.mime_type,
            file_size: image.file_size,
            storage_provider: image.storage_provider,
            created_at: now,
            updated_at: now,
        };
        images.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>, AppError> {
        Ok(self.images.lock().unwrap().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::from(sqlx::Error::PoolTimedOut));
        }
        Ok(self.images.lock().unwrap().remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgvault_core::StorageProvider;

    fn new_image(id: Uuid) -> NewImage {
        NewImage {
            id,
            filename: format!("{}.png", id),
            url: format!("http://localhost:9000/images/{}.png", id),
            description: None,
            original_name: Some("cat.png".to_string()),
            mime_type: Some("image/png".to_string()),
            file_size: Some(1024),
            storage_provider: StorageProvider::Minio,
        }
    }

    #[tokio::test]
    async fn test_insert_find_delete() {
        let repo = InMemoryImageRepository::new();
        let id = Uuid::new_v4();

        let stored = repo.insert(new_image(id)).await.unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.created_at, stored.updated_at);

        assert_eq!(repo.find_by_id(id).await.unwrap(), Some(stored));
        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_filename_rejected() {
        let repo = InMemoryImageRepository::new();
        let first = new_image(Uuid::new_v4());
        let mut second = new_image(Uuid::new_v4());
        second.filename = first.filename.clone();

        repo.insert(first).await.unwrap();
        assert!(matches!(
            repo.insert(second).await,
            Err(AppError::Database(_))
        ));
        assert_eq!(repo.len(), 1);
    }
}
