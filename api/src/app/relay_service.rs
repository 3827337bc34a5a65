//! Relay service
//!
//! Runs one contact-form submission through its lifecycle:
//! honeypot check, rate limiting, validation, then the outbound relay.
//! Every early exit is reported as a `Submission` for the response mapper.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;

use super::rate_limiter::{RateLimitStatus, RateLimiter};
use crate::config::Environment;
use crate::domain::entities::{EnquiryForm, MessageId};
use crate::domain::ports::EmailRelay;
use crate::error::AppError;

/// What happened to an accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Honeypot was filled; nothing was sent. Reported to the caller as success.
    Discarded,
    Relayed(MessageId),
}

/// Result of a submission plus the caller's remaining quota, when it was consulted
#[derive(Debug)]
pub struct Submission {
    pub result: Result<SubmissionOutcome, AppError>,
    pub quota: Option<RateLimitStatus>,
}

pub struct RelayService {
    relay: Arc<dyn EmailRelay>,
    limiter: Arc<RateLimiter>,
    environment: Environment,
}

impl RelayService {
    pub fn new(
        relay: Arc<dyn EmailRelay>,
        limiter: Arc<RateLimiter>,
        environment: Environment,
    ) -> Self {
        Self {
            relay,
            limiter,
            environment,
        }
    }

    pub async fn submit(&self, form: EnquiryForm, source_ip: IpAddr) -> Submission {
        if form.is_spam() {
            tracing::warn!(ip = %source_ip, "Honeypot field filled, discarding submission");
            return Submission {
                result: Ok(SubmissionOutcome::Discarded),
                quota: None,
            };
        }

        let quota = match self.admit(source_ip) {
            Ok(quota) => quota,
            Err(rejected) => return rejected,
        };

        let enquiry = match form.validate(source_ip, Utc::now()) {
            Ok(enquiry) => enquiry,
            Err(e) => {
                tracing::debug!(ip = %source_ip, error = %e, "Enquiry failed validation");
                return Submission {
                    result: Err(e.into()),
                    quota: Some(quota),
                };
            }
        };

        let result = match self.relay.send(&enquiry).await {
            Ok(message_id) => {
                tracing::info!(
                    message_id = %message_id,
                    from = %enquiry.email,
                    ip = %source_ip,
                    "Enquiry relayed"
                );
                Ok(SubmissionOutcome::Relayed(message_id))
            }
            Err(source) => Err(AppError::Delivery {
                source,
                expose_detail: self.environment.exposes_error_detail(),
            }),
        };

        Submission {
            result,
            quota: Some(quota),
        }
    }

    /// A request whose body could not be decoded still counts against its IP
    pub fn refuse(&self, error: AppError, source_ip: IpAddr) -> Submission {
        match self.admit(source_ip) {
            Ok(quota) => Submission {
                result: Err(error),
                quota: Some(quota),
            },
            Err(rejected) => rejected,
        }
    }

    fn admit(&self, source_ip: IpAddr) -> Result<RateLimitStatus, Submission> {
        self.limiter.check(source_ip).map_err(|e| {
            tracing::info!(ip = %source_ip, retry_after = ?e.retry_after, "Rate limit exceeded");
            Submission {
                result: Err(e.into()),
                quota: None,
            }
        })
    }
}
