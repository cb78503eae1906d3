//! Route configuration and setup.
//!
//! Image routes and health checks share one router; the layer stack is applied
//! on top of both.

mod health;

pub use health::HealthCheckResponse;

use crate::api_doc::get_openapi_spec;
use crate::constants::MULTIPART_OVERHEAD_BYTES;
use crate::handlers::{image_delete, image_get, image_upload};
use crate::middleware::{hide_error_details, request_id_middleware};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use imgvault_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Build the application router over `state`.
pub fn build_router(config: &Config, state: Arc<AppState>) -> Router {
    let cors = setup_cors(config);
    let body_limit = config.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES;

    tracing::info!(body_limit_bytes = body_limit, "Request body limit enabled");

    let mut router = image_routes()
        .merge(health_routes())
        .route("/api/openapi.json", get(openapi_json));
    if config.is_production() {
        router = router.layer(axum::middleware::from_fn(hide_error_details));
    }

    router
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

fn image_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/images", post(image_upload::upload_image))
        .route(
            "/images/{id}",
            get(image_get::get_image).delete(image_delete::delete_image),
        )
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
}

async fn openapi_json() -> impl IntoResponse {
    Json(get_openapi_spec())
}

fn setup_cors(config: &Config) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins()
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    }
}
