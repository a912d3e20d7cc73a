//! Error taxonomy for the API.
//!
//! Recoverable conditions (`NotFound`, `Validation`, `InvalidOperation`)
//! surface as structured 4xx bodies with a machine-readable code.
//! `Unexpected` covers everything else (data-store failures and the like):
//! logged in full, returned to the caller as a generic message unless dev
//! mode is enabled.

use crate::config;
use crate::logging::{RequestLog, TRACE_HEADER};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{resource} with identifier '{identifier}' not found")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidOperation(String),
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, identifier: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource,
            identifier: identifier.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "RESOURCE_NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidOperation(_) => "INVALID_OPERATION",
            ApiError::Unexpected(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Renders the structured error body, logging the error against the
    /// request's trace id on the way out.
    pub fn to_response(&self, log: &RequestLog) -> HttpResponse {
        let status = self.status_code();

        let message = match self {
            ApiError::Unexpected(detail) => {
                log.error(&format!("Unexpected error: {}", detail));
                "Internal server error".to_string()
            }
            other => {
                log.warn(&other.to_string());
                other.to_string()
            }
        };

        let mut body = json!({
            "statusCode": status.as_u16(),
            "message": message,
            "code": self.code(),
            "timestamp": Utc::now().to_rfc3339(),
            "traceId": log.trace_id(),
        });
        if let ApiError::Unexpected(detail) = self {
            if config::dev_mode() {
                body["details"] = json!({ "error": detail });
            }
        }

        HttpResponse::build(status)
            .insert_header((TRACE_HEADER, log.trace_id()))
            .json(body)
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Unexpected(err.to_string())
    }
}
