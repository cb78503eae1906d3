use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::storage_types::StorageProvider;

/// Persisted image metadata. The object itself lives in `storage_provider` under `filename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: Uuid,
    pub filename: String,
    pub url: String,
    pub description: Option<String>,
    pub original_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub storage_provider: StorageProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Image {
    /// Object key in the backing store.
    pub fn storage_key(&self) -> &str {
        &self.filename
    }
}

/// Fields supplied on insert; timestamps are assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub id: Uuid,
    pub filename: String,
    pub url: String,
    pub description: Option<String>,
    pub original_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub storage_provider: StorageProvider,
}

impl NewImage {
    /// Object key for an image: the id followed by the client's extension, verbatim.
    ///
    /// `cat.PNG` becomes `{id}.PNG`; a name without an extension yields just the id.
    pub fn storage_key_for(id: Uuid, original_name: &str) -> String {
        format!("{}{}", id, file_extension(original_name))
    }
}

/// Extension of `name` including the leading dot, or an empty string.
///
/// Only the final path component is considered, and a leading dot (`.png`) is a
/// hidden-file name rather than an extension.
pub fn file_extension(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: Uuid,
    pub filename: String,
    pub url: String,
    pub description: Option<String>,
    pub original_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub storage_provider: StorageProvider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        ImageResponse {
            id: image.id,
            filename: image.filename,
            url: image.url,
            description: image.description,
            original_name: image.original_name,
            mime_type: image.mime_type,
            file_size: image.file_size,
            storage_provider: image.storage_provider,
            created_at: image.created_at,
            updated_at: image.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_keeps_extension_verbatim() {
        let id = Uuid::new_v4();
        assert_eq!(NewImage::storage_key_for(id, "cat.png"), format!("{}.png", id));
        assert_eq!(NewImage::storage_key_for(id, "Cat.JPEG"), format!("{}.JPEG", id));
        assert_eq!(
            NewImage::storage_key_for(id, "archive.tar.png"),
            format!("{}.png", id)
        );
    }

    #[test]
    fn test_storage_key_without_extension_is_id() {
        let id = Uuid::new_v4();
        assert_eq!(NewImage::storage_key_for(id, "README"), id.to_string());
        assert_eq!(NewImage::storage_key_for(id, ".png"), id.to_string());
    }

    #[test]
    fn test_file_extension_ignores_directories() {
        assert_eq!(file_extension("some.dir/photo"), "");
        assert_eq!(file_extension("C:\\pics\\photo.jpg"), ".jpg");
    }

    #[test]
    fn test_image_response_from_image() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let image = Image {
            id,
            filename: format!("{}.png", id),
            url: format!("http://localhost:9000/images/{}.png", id),
            description: Some("a cat".to_string()),
            original_name: Some("cat.png".to_string()),
            mime_type: Some("image/png".to_string()),
            file_size: Some(1024),
            storage_provider: StorageProvider::Minio,
            created_at: now,
            updated_at: now,
        };

        let response = ImageResponse::from(image.clone());

        assert_eq!(response.id, id);
        assert_eq!(response.filename, image.filename);
        assert_eq!(response.url, image.url);
        assert_eq!(response.description.as_deref(), Some("a cat"));
        assert_eq!(response.original_name.as_deref(), Some("cat.png"));
        assert_eq!(response.file_size, Some(1024));
        assert_eq!(response.storage_provider, StorageProvider::Minio);
        assert_eq!(response.created_at, now);
    }

    #[test]
    fn test_image_response_serializes_camel_case_with_nulls() {
        let now = Utc::now();
        let response = ImageResponse {
            id: Uuid::new_v4(),
            filename: "x.jpg".to_string(),
            url: "https://bucket.s3.eu-west-1.amazonaws.com/x.jpg".to_string(),
            description: None,
            original_name: Some("x.jpg".to_string()),
            mime_type: None,
            file_size: None,
            storage_provider: StorageProvider::S3,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["originalName"], "x.jpg");
        assert_eq!(json["storageProvider"], "s3");
        assert!(json["description"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("original_name").is_none());
    }
}
