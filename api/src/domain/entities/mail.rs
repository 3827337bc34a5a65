//! Outbound mail rendered from an enquiry
//!
//! Both transports send the same subject and bodies; only the envelope differs.

use std::fmt;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enquiry::{escape_html, Enquiry};

/// Provider-assigned (or, for SMTP, locally generated) message identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// RFC 5322 style `<unique@domain>` id, using the sender's domain
    pub fn generate(sender_email: &str) -> Self {
        let domain = sender_email
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .filter(|domain| !domain.is_empty())
            .unwrap_or("localhost");
        Self(format!("<{}@{}>", Uuid::new_v4(), domain))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const RULE: &str = "========================================";
const DASHES: &str = "----------------------------------------";

#[derive(Debug, Clone)]
pub struct EnquiryMail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EnquiryMail {
    pub fn render(enquiry: &Enquiry, company_name: &str, utc_offset: FixedOffset) -> Self {
        let submitted = enquiry
            .submitted_at
            .with_timezone(&utc_offset)
            .format("%d/%m/%Y %H:%M:%S (UTC%:z)")
            .to_string();

        let text = format!(
            "New enquiry from {company_name} website\n\
             \n\
             {RULE}\n\
             CONTACT DETAILS\n\
             {RULE}\n\
             Name:        {name}\n\
             Email:       {email}\n\
             Company:     {company}\n\
             Country:     {country}\n\
             {RULE}\n\
             \n\
             MESSAGE:\n\
             {DASHES}\n\
             {message}\n\
             {DASHES}\n\
             \n\
             Submitted: {submitted}\n\
             IP: {ip}\n",
            name = enquiry.name,
            email = enquiry.email,
            company = enquiry.company,
            country = enquiry.country,
            message = enquiry.message,
            ip = enquiry.source_ip,
        );

        let company_name_html = escape_html(company_name);
        let html = format!(
            "<html><body style=\"font-family: Arial, sans-serif; color: #222;\">\
             <h2>New enquiry from {company_name_html} website</h2>\
             <table cellpadding=\"6\" style=\"border-collapse: collapse;\">\
             <tr><td><strong>Name</strong></td><td>{name}</td></tr>\
             <tr><td><strong>Email</strong></td><td><a href=\"mailto:{email}\">{email}</a></td></tr>\
             <tr><td><strong>Company</strong></td><td>{company}</td></tr>\
             <tr><td><strong>Country</strong></td><td>{country}</td></tr>\
             </table>\
             <h3>Message</h3>\
             <p>{message}</p>\
             <hr>\
             <p style=\"font-size: 12px; color: #666;\">Submitted: {submitted}<br>IP: {ip}</p>\
             </body></html>",
            name = enquiry.name,
            email = escape_html(&enquiry.email),
            company = enquiry.company,
            country = enquiry.country,
            message = enquiry.message.replace('\n', "<br>"),
            ip = enquiry.source_ip,
        );

        Self {
            subject: format!("Website Contact Enquiry - {}", company_name),
            text,
            html,
        }
    }
}
