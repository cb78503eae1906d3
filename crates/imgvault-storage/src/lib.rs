//! imgvault storage library
//!
//! The [`Storage`] trait abstracts the object store holding image bytes. Two backends
//! implement it on top of aws-sdk-s3:
//!
//! - [`S3Storage`]: AWS S3, virtual-hosted style public URLs.
//! - [`MinioStorage`]: MinIO over path-style addressing, direct or presigned URLs.
//!
//! [`StorageSet`] routes operations to the backend named by an image's
//! [`StorageProvider`] tag.
//!
//! Keys are flat object names (`{uuid}{ext}`). They must not be empty, start with `/`,
//! or contain `..`.

mod bucket_client;
pub mod factory;
pub(crate) mod keys;
pub mod minio;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage_set, StorageSet};
pub use imgvault_core::StorageProvider;
pub use minio::MinioStorage;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockStorage;
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
