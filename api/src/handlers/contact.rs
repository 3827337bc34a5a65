//! Contact form handler
//!
//! `POST /api/send-email` relays a website enquiry to the company inbox.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use super::envelope::{rate_limit_headers, ApiResponse};
use crate::app::{Submission, SubmissionOutcome};
use crate::error::AppError;
use crate::extract::{ClientIp, EnquiryPayload};
use crate::AppState;

/// POST /api/send-email
///
/// Accepts JSON or form-encoded `{name, email, company?, country, message, website?}`.
/// `website` is a honeypot: when filled the request is answered with a normal
/// success response and nothing is sent. Bodies that fail to decode are still
/// counted by the rate limiter.
pub async fn send_email(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    payload: Result<EnquiryPayload, AppError>,
) -> Submission {
    match payload {
        Ok(EnquiryPayload(form)) => state.relay_service.submit(form, ip).await,
        Err(rejection) => state.relay_service.refuse(rejection, ip),
    }
}

impl IntoResponse for Submission {
    fn into_response(self) -> Response {
        let mut response = match self.result {
            Ok(SubmissionOutcome::Relayed(message_id)) => {
                Json(ApiResponse::success(Some(message_id.to_string()))).into_response()
            }
            Ok(SubmissionOutcome::Discarded) => Json(ApiResponse::success(None)).into_response(),
            Err(e) => e.into_response(),
        };

        if let Some(quota) = self.quota {
            let headers = response.headers_mut();
            for (name, value) in rate_limit_headers(quota.limit, quota.remaining, quota.reset_after)
            {
                headers.insert(name, value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;

    use super::*;
    use crate::app::RateLimitStatus;
    use crate::domain::entities::MessageId;
    use crate::error::{DeliveryError, ValidationError};

    fn quota() -> RateLimitStatus {
        RateLimitStatus {
            limit: 5,
            remaining: 3,
            reset_after: Duration::from_secs(840),
        }
    }

    #[test]
    fn relayed_submission_is_ok_with_quota_headers() {
        let response = Submission {
            result: Ok(SubmissionOutcome::Relayed(MessageId::new("<id@relay>"))),
            quota: Some(quota()),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["ratelimit-limit"], "5");
        assert_eq!(response.headers()["ratelimit-remaining"], "3");
        assert_eq!(response.headers()["ratelimit-reset"], "840");
    }

    #[test]
    fn discarded_submission_looks_like_success() {
        let response = Submission {
            result: Ok(SubmissionOutcome::Discarded),
            quota: None,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("ratelimit-limit").is_none());
    }

    #[test]
    fn delivery_failure_keeps_quota_headers() {
        let response = Submission {
            result: Err(AppError::Delivery {
                source: DeliveryError::Transport("connection reset".to_string()),
                expose_detail: false,
            }),
            quota: Some(quota()),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["ratelimit-remaining"], "3");
    }

    #[test]
    fn validation_failure_keeps_quota_headers() {
        let response = Submission {
            result: Err(AppError::Validation(ValidationError::MissingFields)),
            quota: Some(quota()),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["ratelimit-limit"], "5");
        assert_eq!(response.headers()["ratelimit-remaining"], "3");
    }
}
