//! Email relay port trait
//!
//! Defines the interface for handing an enquiry to a transactional-email
//! provider. Implemented by the Brevo HTTP API and SMTP adapters.

use async_trait::async_trait;

use crate::domain::entities::{Enquiry, MessageId};
use crate::error::DeliveryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailRelay: Send + Sync {
    /// Deliver the enquiry to the company inbox. No retries; a timeout is
    /// reported as `DeliveryError::Timeout`.
    async fn send(&self, enquiry: &Enquiry) -> Result<MessageId, DeliveryError>;
}
