use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::ImageId;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use imgvault_core::ImageResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/images/{id}",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image ID (UUID v4)")
    ),
    responses(
        (status = 200, description = "Image found", body = ImageResponse),
        (status = 400, description = "Invalid image ID", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "get_image"))]
pub async fn get_image(
    ImageId(id): ImageId,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let image = state.images.get(id).await?;
    Ok(Json(ImageResponse::from(image)))
}
