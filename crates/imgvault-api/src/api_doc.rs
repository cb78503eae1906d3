//! OpenAPI documentation served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use imgvault_core::models;
use imgvault_core::StorageProvider;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgvault API",
        version = "0.1.0",
        description = "Image upload, retrieval and deletion backed by Postgres metadata and MinIO/S3 object storage."
    ),
    paths(
        handlers::image_upload::upload_image,
        handlers::image_get::get_image,
        handlers::image_delete::delete_image,
    ),
    components(schemas(
        models::ImageResponse,
        StorageProvider,
        error::ErrorResponse,
    )),
    tags(
        (name = "images", description = "Image upload and management")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_image_paths() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/images"));
        assert!(spec.paths.paths.contains_key("/images/{id}"));
    }
}
