//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use crate::services::{AnalysisError, AuthClientError};
use aquafit_shared::types::{ErrorDetail, ErrorResponse};
use aquafit_shared::{FormError, ImageError, InputError};
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Validation failed: {0}")]
    Form(#[from] FormError),

    #[error("Image rejected: {0}")]
    Image(#[from] ImageError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Auth(#[from] AuthClientError),

    #[error("AI analysis is not configured")]
    AiUnavailable,

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(err.body_text())
        }
    }
}

impl ApiError {
    fn detail(code: &str, message: String) -> ErrorDetail {
        ErrorDetail {
            code: code.to_string(),
            message,
            field: None,
            details: None,
        }
    }

    fn parts(&self) -> (StatusCode, ErrorDetail) {
        match self {
            ApiError::InvalidInput(err) => {
                let mut detail = Self::detail("INVALID_INPUT", err.to_string());
                detail.field = Some(err.field().to_string());
                (StatusCode::BAD_REQUEST, detail)
            }
            ApiError::Form(err) => {
                let mut detail = Self::detail("VALIDATION_ERROR", err.to_string());
                detail.field = err.errors.first().map(|e| e.field.clone());
                detail.details = Some(json!(err
                    .errors
                    .iter()
                    .map(|e| json!({
                        "field": e.field,
                        "label": e.display_label,
                        "message": e.message,
                    }))
                    .collect::<Vec<_>>()));
                (StatusCode::BAD_REQUEST, detail)
            }
            ApiError::Image(err) => {
                let status = match err {
                    ImageError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    ImageError::NotAnImage(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    ImageError::Empty => StatusCode::BAD_REQUEST,
                };
                let mut detail = Self::detail("INVALID_IMAGE", err.to_string());
                detail.field = Some("image".to_string());
                (status, detail)
            }
            ApiError::Analysis(err) => match err {
                AnalysisError::Incomplete { missing } => {
                    let mut detail = Self::detail("INCOMPLETE_INPUT", err.to_string());
                    detail.details = Some(json!({ "missing": missing }));
                    (StatusCode::BAD_REQUEST, detail)
                }
                AnalysisError::AlreadyRunning => (
                    StatusCode::CONFLICT,
                    Self::detail("ANALYSIS_IN_PROGRESS", err.to_string()),
                ),
                AnalysisError::Exhausted {
                    attempts,
                    service_failures,
                    malformed_responses,
                    last_failure,
                } => {
                    warn!(attempts, last_failure = %last_failure, "Analysis exhausted");
                    let mut detail = Self::detail("ANALYSIS_FAILED", err.to_string());
                    detail.details = Some(json!({
                        "attempts": attempts,
                        "service_failures": service_failures,
                        "malformed_responses": malformed_responses,
                    }));
                    (StatusCode::BAD_GATEWAY, detail)
                }
                AnalysisError::Unexpected(reason) => {
                    error!("Unexpected analysis failure: {}", reason);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Self::detail("INTERNAL_ERROR", "An internal error occurred".to_string()),
                    )
                }
            },
            ApiError::Auth(err) => match err {
                AuthClientError::Rejected { status, message } => (
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                    Self::detail("AUTH_REJECTED", message.clone()),
                ),
                AuthClientError::Unavailable(reason) => {
                    error!("Auth service unavailable: {}", reason);
                    (
                        StatusCode::BAD_GATEWAY,
                        Self::detail(
                            "AUTH_UNAVAILABLE",
                            "Authentication service is unavailable".to_string(),
                        ),
                    )
                }
            },
            ApiError::AiUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Self::detail("AI_UNAVAILABLE", self.to_string()),
            ),
            ApiError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Self::detail("PAYLOAD_TOO_LARGE", msg.clone()),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Self::detail("BAD_REQUEST", msg.clone()),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.parts();
        (status, Json(ErrorResponse { error: detail })).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
