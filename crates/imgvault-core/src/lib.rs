//! imgvault core library
//!
//! Domain model, error taxonomy and configuration shared by the storage, database
//! and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, DatabaseConfig, MinioConfig, S3Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{Image, ImageResponse, NewImage};
pub use storage_types::StorageProvider;
