//! Shared application state.

use crate::services::images::ImageService;
use crate::utils::upload::UploadPolicy;
use imgvault_core::Config;
use imgvault_db::ImageRepository;
use imgvault_storage::StorageSet;
use std::sync::Arc;

/// State handed to every handler through `State<Arc<AppState>>`.
#[derive(Clone)]
pub struct AppState {
    pub images: ImageService,
    pub upload_policy: UploadPolicy,
}

impl AppState {
    pub fn new(
        config: &Config,
        repository: Arc<dyn ImageRepository>,
        storage: StorageSet,
    ) -> Self {
        let upload_policy = UploadPolicy {
            max_file_size_bytes: config.max_file_size_bytes(),
            allowed_extensions: config.allowed_extensions().to_vec(),
        };
        Self {
            images: ImageService::new(repository, storage),
            upload_policy,
        }
    }
}
