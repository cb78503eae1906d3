//! imgvault database layer
//!
//! [`ImageRepository`] is the seam between the upload/delete orchestration and
//! Postgres; [`PgImageRepository`] is the production implementation.

pub mod image;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use image::{ImageRepository, PgImageRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryImageRepository;
