use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::ImageId;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Delete the stored object, then its metadata row.
#[utoipa::path(
    delete,
    path = "/images/{id}",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image ID (UUID v4)")
    ),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 400, description = "Invalid image ID", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "delete_image"))]
pub async fn delete_image(
    ImageId(id): ImageId,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.images.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
