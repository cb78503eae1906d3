//! imgvault API library
//!
//! HTTP handlers, the upload/delete orchestration service, and application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
pub mod telemetry;
pub mod utils;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::images::{ImageService, UploadedImage};
pub use state::AppState;
