//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Any `AppError` converts
//! into `HttpAppError` with `?` and renders as a JSON [`ErrorResponse`].
//!
//! Responses carry full details. In production the router adds
//! [`crate::middleware::hide_error_details`], which swaps in the detail-free body
//! stored as a [`RedactedErrorBody`] extension.

use crate::utils::upload::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgvault_core::{AppError, ErrorMetadata, LogLevel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse (orphan rule).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { max } => AppError::PayloadTooLarge(format!(
                "File size exceeds maximum allowed size of {} bytes",
                max
            )),
            ValidationError::InvalidExtension { allowed } => AppError::BadRequest(format!(
                "Allow only image files type {}!",
                allowed.join(", ")
            )),
            ValidationError::MissingFile => {
                AppError::InvalidInput("File is required.".to_string())
            }
            ValidationError::DuplicateFile => AppError::BadRequest(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ),
            ValidationError::InvalidDescription(msg) => AppError::InvalidInput(msg),
            ValidationError::Malformed(msg) => AppError::BadRequest(msg),
            ValidationError::Io(err) => AppError::Internal(format!("IO error: {}", err)),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Detail-free rendering of an error response, kept in the response extensions.
#[derive(Debug, Clone)]
pub struct RedactedErrorBody(pub ErrorResponse);

/// Build the JSON body for `error`, omitting details when `hide_details` is set.
pub fn error_response(error: &AppError, hide_details: bool) -> ErrorResponse {
    let (details, error_type) = if hide_details || error.is_sensitive() {
        (None, None)
    } else {
        (
            Some(error.detailed_message()),
            Some(error.error_type().to_string()),
        )
    };

    ErrorResponse {
        error: error.client_message(),
        details,
        error_type,
        code: error.error_code().to_string(),
        recoverable: error.is_recoverable(),
        suggested_action: error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let mut response = (status, Json(error_response(app_error, false))).into_response();
        response
            .extensions_mut()
            .insert(RedactedErrorBody(error_response(app_error, true)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_extension_message() {
        let err = ValidationError::InvalidExtension {
            allowed: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
        };
        let HttpAppError(app_err) = err.into();
        assert_eq!(app_err.http_status_code(), 400);
        assert_eq!(
            app_err.client_message(),
            "Allow only image files type jpg, jpeg, png!"
        );
    }

    #[test]
    fn test_file_too_large_is_413() {
        let err = ValidationError::FileTooLarge { max: 2 * 1024 * 1024 };
        let HttpAppError(app_err) = err.into();
        assert_eq!(app_err.http_status_code(), 413);
        assert!(app_err.client_message().contains("2097152"));
    }

    #[test]
    fn test_missing_file_is_400() {
        let HttpAppError(app_err) = ValidationError::MissingFile.into();
        assert_eq!(app_err.http_status_code(), 400);
    }

    #[test]
    fn test_error_response_hides_sensitive_details() {
        let err = AppError::Storage("minio:9000 refused connection".to_string());
        let body = error_response(&err, false);
        assert_eq!(body.error, "Failed to access storage");
        assert_eq!(body.code, "STORAGE_ERROR");
        assert!(body.details.is_none());
        assert!(body.recoverable);
    }

    #[test]
    fn test_error_response_details_for_client_errors() {
        let err = AppError::NotFound("Image not found.".to_string());
        let body = error_response(&err, false);
        assert_eq!(body.error, "Image not found.");
        assert_eq!(body.error_type.as_deref(), Some("NotFound"));
        assert!(body.details.unwrap().contains("Image not found."));

        let hidden = error_response(&err, true);
        assert!(hidden.details.is_none());
        assert!(hidden.error_type.is_none());
    }

    #[test]
    fn test_response_carries_redacted_body() {
        let err = AppError::NotFound("Image not found.".to_string());
        let response = HttpAppError(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let RedactedErrorBody(redacted) = response
            .extensions()
            .get::<RedactedErrorBody>()
            .cloned()
            .expect("redacted body");
        assert_eq!(redacted.error, "Image not found.");
        assert!(redacted.details.is_none());
        assert!(redacted.error_type.is_none());
    }

    /// Serialized ErrorResponse has "error", "code", "recoverable", and optional fields.
    #[test]
    fn test_error_response_shape() {
        let response = error_response(&AppError::BadRequest("bad".to_string()), false);
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(json["recoverable"], false);
        assert!(json.get("error").and_then(|v| v.as_str()).is_some());
        assert!(json.get("suggested_action").is_some());
    }
}
