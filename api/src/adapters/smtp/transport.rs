//! SMTP relay implementation

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::Error as SmtpError;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{MailboxConfig, SmtpConfig};
use crate::domain::entities::{Enquiry, EnquiryMail, MessageId};
use crate::domain::ports::EmailRelay;
use crate::error::DeliveryError;

/// Port that speaks TLS from the first byte instead of upgrading with STARTTLS
const IMPLICIT_TLS_PORT: u16 = 465;

pub struct SmtpRelay {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    mailbox: MailboxConfig,
    from: Mailbox,
    to: Mailbox,
    timeout: Duration,
}

impl SmtpRelay {
    /// Must be called inside a tokio runtime (the connection pool spawns a reaper task).
    pub fn new(
        config: &SmtpConfig,
        mailbox: &MailboxConfig,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let mailer = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self {
            mailer,
            mailbox: mailbox.clone(),
            from: Mailbox::new(
                Some(mailbox.sender_name.clone()),
                parse_address(&mailbox.sender_email)?,
            ),
            to: Mailbox::new(None, parse_address(&mailbox.recipient)?),
            timeout,
        })
    }

    /// Open a connection and authenticate without sending anything
    pub async fn verify(&self) -> Result<bool, DeliveryError> {
        self.mailer
            .test_connection()
            .await
            .map_err(|e| self.smtp_error(e))
    }

    fn build_message(&self, enquiry: &Enquiry) -> Result<(Message, MessageId), DeliveryError> {
        let mail = EnquiryMail::render(
            enquiry,
            &self.mailbox.company_name,
            self.mailbox.utc_offset,
        );
        let message_id = MessageId::generate(&self.mailbox.sender_email);
        let reply_to = Mailbox::new(
            Some(enquiry.reply_name.clone()),
            parse_address(&enquiry.email)?,
        );

        let message = Message::builder()
            .message_id(Some(message_id.to_string()))
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .subject(mail.subject)
            .multipart(MultiPart::alternative_plain_html(mail.text, mail.html))
            .map_err(|e| DeliveryError::Message(e.to_string()))?;

        Ok((message, message_id))
    }

    fn smtp_error(&self, error: SmtpError) -> DeliveryError {
        if error.is_timeout() {
            DeliveryError::Timeout(self.timeout)
        } else if let Some(code) = error.status() {
            DeliveryError::Rejected {
                status: code.to_string().parse().unwrap_or_default(),
                message: error.to_string(),
            }
        } else {
            DeliveryError::Transport(error.to_string())
        }
    }
}

fn parse_address(email: &str) -> Result<Address, DeliveryError> {
    email
        .parse::<Address>()
        .map_err(|e| DeliveryError::Message(format!("{}: {}", email, e)))
}

#[async_trait]
impl EmailRelay for SmtpRelay {
    async fn send(&self, enquiry: &Enquiry) -> Result<MessageId, DeliveryError> {
        let (message, message_id) = self.build_message(enquiry)?;

        let response = tokio::time::timeout(self.timeout, self.mailer.send(message))
            .await
            .map_err(|_| DeliveryError::Timeout(self.timeout))?
            .map_err(|e| self.smtp_error(e))?;

        tracing::debug!(code = %response.code(), message_id = %message_id, "SMTP server accepted message");
        Ok(message_id)
    }
}
