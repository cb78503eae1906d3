//! Request-scoped middleware.

use crate::error::RedactedErrorBody;
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::{extract::Request, middleware::Next, response::Response, Json};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID stored in request extensions.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Propagate an incoming `X-Request-ID` or mint one, and echo it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Replace error bodies with their detail-free rendering. Installed in production only.
pub async fn hide_error_details(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let redacted = response.extensions().get::<RedactedErrorBody>().cloned();
    match redacted {
        Some(RedactedErrorBody(body)) => (response.status(), Json(body)).into_response(),
        None => response,
    }
}
