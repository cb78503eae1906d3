//! Constants shared across crates.

/// Default upload cap: 2 MiB.
pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 2 * 1024 * 1024;

/// Extensions accepted by the upload endpoint (lowercase, without the dot).
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// `Cache-Control` attached to every stored object.
pub const OBJECT_CACHE_CONTROL: &str = "max-age=31536000";

/// Lifetime of presigned GET URLs: 7 days.
pub const PRESIGNED_URL_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Default MinIO bucket name.
pub const DEFAULT_MINIO_BUCKET: &str = "images";

/// Port the MinIO client connects to when `MINIO_PORT` is unset.
pub const DEFAULT_MINIO_PORT: u16 = 9000;

/// Region used for MinIO requests and bucket creation.
pub const MINIO_REGION: &str = "us-east-1";
