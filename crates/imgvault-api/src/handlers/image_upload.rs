use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_image_upload;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use imgvault_core::{AppError, ImageResponse};
use std::sync::Arc;

/// Upload image handler
///
/// Accepts a multipart body with a `file` field and an optional `description`
/// field, stores the file in the active backend and records its metadata.
///
/// # Errors
/// - `AppError::BadRequest` - missing file, disallowed extension, malformed body
/// - `AppError::InvalidInput` - description outside 1..=255 characters
/// - `AppError::PayloadTooLarge` - file exceeds the size limit
/// - `AppError::Storage` / `AppError::Database` - backend failure
#[utoipa::path(
    post,
    path = "/images",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`file` (jpg, jpeg or png) and optional `description`"),
    responses(
        (status = 201, description = "Image uploaded", body = ImageResponse),
        (status = 400, description = "Invalid upload", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let multipart = multipart.map_err(|e| {
        AppError::BadRequest(format!("Invalid multipart request: {}", e.body_text()))
    })?;

    let upload = extract_image_upload(multipart, &state.upload_policy).await?;
    let image = state.images.upload(upload).await?;

    Ok((StatusCode::CREATED, Json(ImageResponse::from(image))))
}
