//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod rate_limiter;
pub mod relay_service;

pub use rate_limiter::{RateLimitStatus, RateLimiter};
pub use relay_service::{RelayService, Submission, SubmissionOutcome};
