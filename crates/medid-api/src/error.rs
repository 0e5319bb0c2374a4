//! # API Error Types
//!
//! [`AppError`] implements `axum::response::IntoResponse`. Every service
//! error keeps its machine-readable code; the HTTP status is chosen here.
//! Internal error text is logged and replaced before it reaches a client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medid_service::ServiceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "DUPLICATE").
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// A core operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Request body or path could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid bearer token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Request body exceeds the transport limit (413).
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Service(err) => {
                let status = match err {
                    ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                    ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                    ServiceError::MalformedCredential(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    ServiceError::Duplicate(_) => StatusCode::CONFLICT,
                    ServiceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                    ServiceError::InvalidType(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.code())
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        }
    }

    fn is_internal(&self) -> bool {
        matches!(self, Self::Service(ServiceError::Internal(_)))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if self.is_internal() {
            tracing::error!(error = %self, "internal server error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
