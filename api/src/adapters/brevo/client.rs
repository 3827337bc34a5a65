//! Brevo transactional email API client
//!
//! https://developers.brevo.com/reference/sendtransacemail

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{BrevoConfig, MailboxConfig};
use crate::domain::entities::{Enquiry, EnquiryMail, MessageId};
use crate::domain::ports::EmailRelay;
use crate::error::DeliveryError;

/// Relays enquiries through Brevo's `POST /v3/smtp/email`
pub struct BrevoRelay {
    http: Client,
    base_url: String,
    api_key: String,
    mailbox: MailboxConfig,
    timeout: Duration,
}

impl BrevoRelay {
    pub fn new(
        config: &BrevoConfig,
        mailbox: &MailboxConfig,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            mailbox: mailbox.clone(),
            timeout,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v3{}", self.base_url, path)
    }

    fn request_error(&self, error: reqwest::Error) -> DeliveryError {
        if error.is_timeout() {
            DeliveryError::Timeout(self.timeout)
        } else {
            DeliveryError::Transport(error.to_string())
        }
    }
}

/// Request types for Brevo API
#[derive(Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: [Contact<'a>; 1],
    reply_to: Contact<'a>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: String,
}

#[async_trait]
impl EmailRelay for BrevoRelay {
    async fn send(&self, enquiry: &Enquiry) -> Result<MessageId, DeliveryError> {
        let mail = EnquiryMail::render(
            enquiry,
            &self.mailbox.company_name,
            self.mailbox.utc_offset,
        );

        let body = SendEmailRequest {
            sender: Contact {
                email: &self.mailbox.sender_email,
                name: Some(&self.mailbox.sender_name),
            },
            to: [Contact {
                email: &self.mailbox.recipient,
                name: None,
            }],
            reply_to: Contact {
                email: &enquiry.email,
                name: Some(&enquiry.reply_name),
            },
            subject: &mail.subject,
            html_content: &mail.html,
            text_content: &mail.text,
        };

        let response = self
            .http
            .post(self.api_url("/smtp/email"))
            .header("api-key", &self.api_key)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SendEmailResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                DeliveryError::Timeout(self.timeout)
            } else {
                DeliveryError::InvalidResponse(e.to_string())
            }
        })?;

        Ok(MessageId::new(parsed.message_id))
    }
}
