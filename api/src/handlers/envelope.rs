//! Uniform JSON envelope returned by the enquiry endpoint

use std::time::Duration;

use axum::http::{header::RETRY_AFTER, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

pub const SUCCESS_MESSAGE: &str = "Email sent successfully";
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";
pub const DELIVERY_FAILURE_MESSAGE: &str = "Failed to send email";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Provider error detail (development mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            message_id,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            message_id: None,
            error: None,
        }
    }
}

/// Whole seconds, rounded up so clients never retry early
fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

/// `RateLimit-Limit`, `RateLimit-Remaining` and `RateLimit-Reset` headers
pub fn rate_limit_headers(
    limit: u32,
    remaining: u32,
    reset_after: Duration,
) -> [(HeaderName, HeaderValue); 3] {
    [
        (RATELIMIT_LIMIT, HeaderValue::from(limit)),
        (RATELIMIT_REMAINING, HeaderValue::from(remaining)),
        (RATELIMIT_RESET, HeaderValue::from(ceil_secs(reset_after))),
    ]
}

pub fn retry_after_header(retry_after: Duration) -> (HeaderName, HeaderValue) {
    (RETRY_AFTER, HeaderValue::from(ceil_secs(retry_after)))
}
