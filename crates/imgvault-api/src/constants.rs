//! HTTP-layer constants.

/// Multipart field carrying the image bytes.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the optional description.
pub const DESCRIPTION_FIELD: &str = "description";

/// Headroom above the file cap for multipart boundaries and the description field.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Readiness/health probe timeout.
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 2;

/// Content type recorded when the client declares none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
