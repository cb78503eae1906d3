//! Multipart upload extraction and validation.
//!
//! The `file` field is checked for an allowed extension from its header, then
//! streamed into a temporary file with the size cap enforced per chunk, so
//! rejected uploads never reach storage.

use crate::constants::{DEFAULT_CONTENT_TYPE, DESCRIPTION_FIELD, FILE_FIELD};
use crate::services::images::UploadedImage;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use imgvault_core::models::file_extension;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use validator::Validate;

const MAX_ORIGINAL_NAME_LENGTH: usize = 255;
/// Width of the `mime_type` column.
const MAX_CONTENT_TYPE_LENGTH: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File exceeds maximum size of {max} bytes")]
    FileTooLarge { max: usize },

    #[error("Invalid file extension, allowed: {allowed:?}")]
    InvalidExtension { allowed: Vec<String> },

    #[error("No file provided")]
    MissingFile,

    #[error("Multiple file fields provided")]
    DuplicateFile,

    #[error("Invalid description: {0}")]
    InvalidDescription(String),

    #[error("Malformed multipart body: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Limits applied to incoming uploads.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size_bytes: usize,
    /// Lowercase, without the leading dot.
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Validate)]
struct DescriptionInput {
    #[validate(length(
        min = 1,
        max = 255,
        message = "description must be between 1 and 255 characters"
    ))]
    description: Option<String>,
}

/// Check the extension of a client-supplied file name, case-insensitively.
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<(), ValidationError> {
    let extension = file_extension(filename)
        .trim_start_matches('.')
        .to_lowercase();

    if extension.is_empty() || !allowed_extensions.contains(&extension) {
        return Err(ValidationError::InvalidExtension {
            allowed: allowed_extensions.to_vec(),
        });
    }

    Ok(())
}

/// Declared part content type, defaulting when absent and bounded by the column width.
pub fn resolve_content_type(declared: Option<&str>) -> Result<String, ValidationError> {
    let content_type = declared
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    if content_type.chars().count() > MAX_CONTENT_TYPE_LENGTH {
        return Err(ValidationError::Malformed(format!(
            "Content type must be at most {} characters",
            MAX_CONTENT_TYPE_LENGTH
        )));
    }
    Ok(content_type.to_string())
}

/// Validate the optional description (1..=255 characters when present).
pub fn validate_description(description: Option<String>) -> Result<Option<String>, ValidationError> {
    let input = DescriptionInput { description };
    input.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| errors.to_string());
        ValidationError::InvalidDescription(message)
    })?;
    Ok(input.description)
}

fn map_multipart_error(err: MultipartError, max: usize) -> ValidationError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::FileTooLarge { max }
    } else {
        ValidationError::Malformed(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Copy a multipart field into a fresh temp file, failing once `max` bytes are exceeded.
///
/// On error the partially written file is removed when the `TempPath` drops.
async fn stream_to_temp_file(
    field: &mut Field<'_>,
    max: usize,
) -> Result<(TempPath, u64), ValidationError> {
    let (std_file, temp_path) = tempfile::NamedTempFile::new()?.into_parts();
    let mut file = tokio::fs::File::from_std(std_file);
    let mut written: usize = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| map_multipart_error(e, max))?
    {
        written += chunk.len();
        if written > max {
            return Err(ValidationError::FileTooLarge { max });
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok((temp_path, written as u64))
}

/// Extract the `file` and optional `description` fields.
///
/// Exactly one `file` field is accepted. Unknown fields are ignored.
pub async fn extract_image_upload(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> Result<UploadedImage, ValidationError> {
    let max = policy.max_file_size_bytes;
    let mut file: Option<(TempPath, String, String, u64)> = None;
    let mut description: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, max))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == FILE_FIELD {
            if file.is_some() {
                return Err(ValidationError::DuplicateFile);
            }

            let original_name = field
                .file_name()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or(ValidationError::MissingFile)?;
            if original_name.chars().count() > MAX_ORIGINAL_NAME_LENGTH {
                return Err(ValidationError::Malformed(format!(
                    "File name must be at most {} characters",
                    MAX_ORIGINAL_NAME_LENGTH
                )));
            }
            validate_file_extension(&original_name, &policy.allowed_extensions)?;

            let content_type = resolve_content_type(field.content_type())?;

            let (temp_path, size) = stream_to_temp_file(&mut field, max).await?;
            tracing::debug!(
                original_name = %original_name,
                content_type = %content_type,
                size_bytes = size,
                "Upload received"
            );
            file = Some((temp_path, original_name, content_type, size));
        } else if field_name == DESCRIPTION_FIELD {
            let text = field
                .text()
                .await
                .map_err(|e| map_multipart_error(e, max))?;
            description = Some(text);
        }
    }

    let (temp_path, original_name, content_type, size) =
        file.ok_or(ValidationError::MissingFile)?;
    let description = validate_description(description)?;

    Ok(UploadedImage {
        file: temp_path,
        original_name,
        content_type,
        size,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
    }

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        assert!(validate_file_extension("cat.png", &allowed()).is_ok());
        assert!(validate_file_extension("CAT.JPG", &allowed()).is_ok());
        assert!(validate_file_extension("photo.Jpeg", &allowed()).is_ok());
    }

    #[test]
    fn test_rejected_extensions() {
        for name in ["cat.gif", "cat.png.exe", "cat", ".png", "cat."] {
            assert!(
                matches!(
                    validate_file_extension(name, &allowed()),
                    Err(ValidationError::InvalidExtension { .. })
                ),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_description_bounds() {
        assert_eq!(validate_description(None).unwrap(), None);
        assert_eq!(
            validate_description(Some("a cat".to_string())).unwrap(),
            Some("a cat".to_string())
        );
        assert!(validate_description(Some("x".repeat(255))).is_ok());
        assert!(matches!(
            validate_description(Some(String::new())),
            Err(ValidationError::InvalidDescription(_))
        ));
        assert!(matches!(
            validate_description(Some("x".repeat(256))),
            Err(ValidationError::InvalidDescription(_))
        ));
    }

    #[test]
    fn test_content_type_defaults_and_bounds() {
        assert_eq!(resolve_content_type(None).unwrap(), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve_content_type(Some("  ")).unwrap(), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve_content_type(Some("image/png")).unwrap(), "image/png");

        let at_limit = format!("image/png; x={}", "a".repeat(100 - 13));
        assert_eq!(resolve_content_type(Some(&at_limit)).unwrap(), at_limit);

        let too_long = format!("image/png; x={}", "a".repeat(200));
        assert!(matches!(
            resolve_content_type(Some(&too_long)),
            Err(ValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_description_counts_characters() {
        // 255 multi-byte characters are within the limit.
        assert!(validate_description(Some("é".repeat(255))).is_ok());
    }
}
