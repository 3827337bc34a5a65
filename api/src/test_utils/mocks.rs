//! Stub implementation of the relay port
//!
//! Records every enquiry it is handed so tests can verify what would have
//! been sent, and answers with a canned outcome.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::{Enquiry, MessageId};
use crate::domain::ports::EmailRelay;
use crate::error::DeliveryError;

#[derive(Debug, Clone)]
enum StubBehavior {
    Accept,
    Reject { status: u16, message: String },
    Timeout(Duration),
}

#[derive(Clone)]
pub struct StubRelay {
    behavior: StubBehavior,
    sent: Arc<RwLock<Vec<Enquiry>>>,
}

impl StubRelay {
    /// Accepts everything and answers `<stub-N@relay.test>`
    pub fn accepting() -> Self {
        Self {
            behavior: StubBehavior::Accept,
            sent: Arc::default(),
        }
    }

    pub fn rejecting(status: u16, message: &str) -> Self {
        Self {
            behavior: StubBehavior::Reject {
                status,
                message: message.to_string(),
            },
            sent: Arc::default(),
        }
    }

    pub fn timing_out(after: Duration) -> Self {
        Self {
            behavior: StubBehavior::Timeout(after),
            sent: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    pub fn sent(&self) -> Vec<Enquiry> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl EmailRelay for StubRelay {
    async fn send(&self, enquiry: &Enquiry) -> Result<MessageId, DeliveryError> {
        let n = {
            let mut sent = self.sent.write().unwrap();
            sent.push(enquiry.clone());
            sent.len()
        };

        match &self.behavior {
            StubBehavior::Accept => Ok(MessageId::new(format!("<stub-{}@relay.test>", n))),
            StubBehavior::Reject { status, message } => Err(DeliveryError::Rejected {
                status: *status,
                message: message.clone(),
            }),
            StubBehavior::Timeout(after) => Err(DeliveryError::Timeout(*after)),
        }
    }
}
