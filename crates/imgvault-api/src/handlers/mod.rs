pub mod image_delete;
pub mod image_get;
pub mod image_upload;

use crate::error::HttpAppError;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use imgvault_core::AppError;
use uuid::Uuid;

/// Path id that must parse as a version 4 UUID.
///
/// Rejects with `400 INVALID_INPUT` in the usual error body instead of axum's
/// plain-text path rejection.
#[derive(Debug, Clone, Copy)]
pub struct ImageId(pub Uuid);

impl<S> FromRequestParts<S> for ImageId
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidInput(format!("Invalid path: {}", e.body_text())))?;

        parse_v4(&raw).map(ImageId).map_err(HttpAppError::from)
    }
}

fn parse_v4(raw: &str) -> Result<Uuid, AppError> {
    let id = Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidInput("Id must be a valid UUID v4".to_string()))?;
    if id.get_version_num() != 4 {
        return Err(AppError::InvalidInput(
            "Id must be a valid UUID v4".to_string(),
        ));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_v4_accepts_random_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_v4(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_v4_rejects_garbage() {
        assert!(matches!(
            parse_v4("not-a-uuid"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_v4_rejects_other_versions() {
        // v1 layout
        assert!(parse_v4("c232ab00-9414-11ec-b3c8-9f6bdeced846").is_err());
        assert!(parse_v4(&Uuid::nil().to_string()).is_err());
    }
}
