//! Upload, fetch and delete orchestration.
//!
//! Upload writes the object before inserting the row; delete removes the object
//! before the row. Neither step is retried.

use imgvault_core::{AppError, Image, NewImage};
use imgvault_db::ImageRepository;
use imgvault_storage::{Storage, StorageSet};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempPath;
use uuid::Uuid;

/// An upload that passed request validation, held in a local temp file.
#[derive(Debug)]
pub struct UploadedImage {
    pub file: TempPath,
    pub original_name: String,
    pub content_type: String,
    pub size: u64,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct ImageService {
    repository: Arc<dyn ImageRepository>,
    storage: StorageSet,
}

impl ImageService {
    pub fn new(repository: Arc<dyn ImageRepository>, storage: StorageSet) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub fn repository(&self) -> &Arc<dyn ImageRepository> {
        &self.repository
    }

    pub fn storage(&self) -> &StorageSet {
        &self.storage
    }

    /// Store the upload in the active backend and record it.
    ///
    /// The temp file is removed whatever the outcome.
    pub async fn upload(&self, upload: UploadedImage) -> Result<Image, AppError> {
        let UploadedImage {
            file,
            original_name,
            content_type,
            size,
            description,
        } = upload;

        let result = self
            .store(&file, original_name, content_type, size, description)
            .await;

        remove_temp_file(file);
        result
    }

    async fn store(
        &self,
        path: &Path,
        original_name: String,
        content_type: String,
        size: u64,
        description: Option<String>,
    ) -> Result<Image, AppError> {
        let id = Uuid::new_v4();
        let filename = NewImage::storage_key_for(id, &original_name);
        let storage = self.storage.active();

        let sent_bytes = storage.put_object(&filename, path, &content_type).await?;

        let url = match storage.object_url(&filename).await {
            Ok(url) => url,
            Err(err) => {
                compensate_upload(storage.as_ref(), &filename).await;
                return Err(err.into());
            }
        };

        let new_image = NewImage {
            id,
            filename,
            url,
            description,
            original_name: Some(original_name),
            mime_type: Some(content_type),
            file_size: i64::try_from(size).ok(),
            storage_provider: storage.provider(),
        };
        let key = new_image.filename.clone();

        match self.repository.insert(new_image).await {
            Ok(image) => {
                tracing::info!(
                    image_id = %image.id,
                    filename = %image.filename,
                    provider = %image.storage_provider,
                    size_bytes = sent_bytes,
                    "Image uploaded"
                );
                Ok(image)
            }
            Err(err) => {
                compensate_upload(storage.as_ref(), &key).await;
                Err(err)
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Image, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found.".to_string()))
    }

    /// Remove the object from the backend named on the row, then the row.
    ///
    /// A failed object removal leaves the row in place.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let image = self.get(id).await?;

        let storage = self.storage.for_provider(image.storage_provider)?;
        storage.remove_object(image.storage_key()).await?;

        if !self.repository.delete(id).await? {
            // Row vanished between the lookup and the delete.
            return Err(AppError::NotFound("Image not found.".to_string()));
        }

        tracing::info!(
            image_id = %id,
            filename = %image.filename,
            provider = %image.storage_provider,
            "Image deleted"
        );
        Ok(())
    }
}

/// Best-effort removal of an object whose metadata could not be recorded.
async fn compensate_upload(storage: &dyn Storage, key: &str) {
    match storage.remove_object(key).await {
        Ok(()) => {
            tracing::warn!(key = %key, "Removed uploaded object after failed insert");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                key = %key,
                "Failed to remove orphaned object after failed insert"
            );
        }
    }
}

fn remove_temp_file(path: TempPath) {
    let shown = path.display().to_string();
    if let Err(e) = path.close() {
        tracing::warn!(error = %e, path = %shown, "Failed to remove temp upload file");
    }
}
