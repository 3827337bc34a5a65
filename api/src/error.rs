//! Unified error types for the Karlin Mail API
//!
//! This module defines error types for each layer:
//! - `ValidationError`: enquiry payload rejected by the form validator
//! - `RateLimitExceeded`: caller IP used up its window
//! - `DeliveryError`: email provider (HTTP API or SMTP) failures
//! - `ConfigError`: startup configuration problems
//! - `AppError`: application layer errors (wraps the above for HTTP responses)

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::handlers::envelope::{
    rate_limit_headers, retry_after_header, ApiResponse, DELIVERY_FAILURE_MESSAGE,
    INVALID_BODY_MESSAGE, RATE_LIMIT_MESSAGE,
};

/// Form validation errors
///
/// The display text is returned to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All required fields must be filled")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Returned by the rate limiter when an IP has no requests left in its window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Rate limit of {limit} requests exceeded, retry in {retry_after:?}")]
pub struct RateLimitExceeded {
    pub limit: u32,
    pub retry_after: Duration,
}

/// Email provider errors
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Provider rejected the message: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("Provider did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Could not build message: {0}")]
    Message(String),
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("No email transport configured: set BREVO_API_KEY, or SMTP_HOST with SMTP_USER and SMTP_PASS")]
    NoTransport,
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    RateLimited(#[from] RateLimitExceeded),

    #[error("Delivery failed: {source}")]
    Delivery {
        #[source]
        source: DeliveryError,
        /// Echo provider detail in the response body (development mode only)
        expose_detail: bool,
    },

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(e.to_string())),
            )
                .into_response(),
            AppError::RateLimited(e) => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ApiResponse::failure(RATE_LIMIT_MESSAGE)),
                )
                    .into_response();
                let headers = response.headers_mut();
                for (name, value) in rate_limit_headers(e.limit, 0, e.retry_after) {
                    headers.insert(name, value);
                }
                let (name, value) = retry_after_header(e.retry_after);
                headers.insert(name, value);
                response
            }
            AppError::Delivery {
                source,
                expose_detail,
            } => {
                tracing::error!(error = %source, "Email relay failed");
                let mut body = ApiResponse::failure(DELIVERY_FAILURE_MESSAGE);
                if expose_detail {
                    body.error = Some(source.to_string());
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            AppError::BadRequest(detail) => {
                tracing::debug!(%detail, "Rejected malformed request body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::failure(INVALID_BODY_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}
