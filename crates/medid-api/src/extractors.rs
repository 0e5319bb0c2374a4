//! # Request Extraction & Validation
//!
//! Handlers take `Result<Json<T>, JsonRejection>` (or `Path`) and pass it
//! through these helpers so that rejections use the structured error body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use medid_service::ServiceError;

use crate::error::AppError;

/// Request types with rules beyond what serde checks.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body, mapping rejections to [`AppError::BadRequest`].
/// A body over the transport limit is [`AppError::PayloadTooLarge`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result.map(|Json(v)| v).map_err(|err| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    })
}

/// Like [`extract_json`], but a body that cannot be read as a verification
/// request is `MALFORMED_CREDENTIAL`, the same as a credential that does not
/// parse.
pub fn extract_credential_json<T>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    extract_json(result).map_err(|err| match err {
        AppError::BadRequest(msg) => AppError::Service(ServiceError::MalformedCredential(msg)),
        other => other,
    })
}

/// [`extract_json`] followed by [`Validate::validate`]. Rule violations are
/// `VALIDATION_ERROR`.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value
        .validate()
        .map_err(|msg| AppError::Service(ServiceError::Validation(msg)))?;
    Ok(value)
}

pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
