//! Error normalization.
//!
//! Every failure that reaches the HTTP boundary becomes exactly one
//! [`ErrorResponse`] body. Handlers return [`ApiError`]; the status code and
//! error code are decided here and nowhere else.
//!
//! | Kind                  | Status          | `error`                 |
//! |-----------------------|-----------------|-------------------------|
//! | [`ApiError::Http`]       | declared status | `HTTP_<status>`         |
//! | [`ApiError::Validation`] | 422             | `VALIDATION_ERROR`      |
//! | [`ApiError::Internal`]   | 500             | `INTERNAL_SERVER_ERROR` |

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::request::RequestId;
use crate::http::response::ErrorResponse;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const VALIDATION_MESSAGE: &str = "Request validation failed";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// One field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Location of the offending value, e.g. `["query", "limit"]`.
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Failures a handler can report.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Explicit failure with a declared status and reason.
    #[error("HTTP {status}: {reason}")]
    Http { status: StatusCode, reason: String },

    /// The request did not satisfy the input schema.
    #[error("validation failed ({} errors)", .0.len())]
    Validation(Vec<FieldError>),

    /// Anything else. The message is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn http(status: StatusCode, reason: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            reason: reason.into(),
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }

    /// Status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Http { status, .. } => *status,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the wire envelope for this error.
    pub fn to_error_response(&self, request_id: &RequestId) -> ErrorResponse {
        let (error, message, detail) = match self {
            ApiError::Http { status, reason } => {
                (format!("HTTP_{}", status.as_u16()), reason.clone(), None)
            }
            ApiError::Validation(errors) => (
                VALIDATION_ERROR.to_string(),
                VALIDATION_MESSAGE.to_string(),
                serde_json::to_value(errors).ok(),
            ),
            ApiError::Internal(_) => (
                INTERNAL_SERVER_ERROR.to_string(),
                INTERNAL_MESSAGE.to_string(),
                None,
            ),
        };
        ErrorResponse {
            error,
            message,
            detail,
            request_id: Some(request_id.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = RequestId::current_or_generate();
        let status = self.status();

        match &self {
            ApiError::Http { reason, .. } => tracing::error!(
                request_id = %request_id,
                status_code = status.as_u16(),
                "HTTP {} error: {}",
                status.as_u16(),
                reason
            ),
            ApiError::Validation(errors) => tracing::error!(
                request_id = %request_id,
                errors = ?errors,
                "Validation error"
            ),
            ApiError::Internal(message) => tracing::error!(
                request_id = %request_id,
                error = %message,
                "Unhandled error"
            ),
        }

        (status, Json(self.to_error_response(&request_id))).into_response()
    }
}

/// Panic handler for `CatchPanicLayer`: a panic is the "any other failure"
/// row of the table.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("panic: {message}")).into_response()
}

/// Framework-default body for unmatched paths: `{"detail":"Not Found"}`.
pub async fn not_found() -> Response {
    default_detail(StatusCode::NOT_FOUND, "Not Found")
}

/// Framework-default body for a known path hit with the wrong method.
pub async fn method_not_allowed() -> Response {
    default_detail(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

fn default_detail(status: StatusCode, detail: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": detail }))).into_response()
}
