//! Enquiry domain entity
//!
//! `EnquiryForm` is the raw submission as it arrives over HTTP. Every field is
//! optional so that a missing field is reported as a validation error rather
//! than a body-parse failure. `EnquiryForm::validate` turns it into an
//! `Enquiry` with its free text trimmed and HTML-escaped.

use std::net::IpAddr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use lettre::Address;
use regex::Regex;
use serde::Deserialize;

use crate::error::ValidationError;

/// Stored in place of an omitted company name
pub const COMPANY_PLACEHOLDER: &str = "Not provided";

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_COMPANY_LEN: usize = 200;
pub const MAX_COUNTRY_LEN: usize = 200;
pub const MAX_MESSAGE_LEN: usize = 5000;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

/// Contact form payload (JSON or form-encoded)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnquiryForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub message: Option<String>,
    /// Honeypot. Hidden on the page, so only bots fill it in.
    pub website: Option<String>,
}

/// A validated, sanitized contact-form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enquiry {
    pub name: String,
    /// Trimmed but unescaped, for the Reply-To display name
    pub reply_name: String,
    /// Trimmed only; already matched against the address pattern
    pub email: String,
    pub company: String,
    pub country: String,
    pub message: String,
    pub source_ip: IpAddr,
    pub submitted_at: DateTime<Utc>,
}

impl EnquiryForm {
    /// True when the honeypot field carries anything but whitespace
    pub fn is_spam(&self) -> bool {
        self.website
            .as_deref()
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn validate(
        &self,
        source_ip: IpAddr,
        submitted_at: DateTime<Utc>,
    ) -> Result<Enquiry, ValidationError> {
        let (Some(name), Some(email), Some(country), Some(message)) = (
            non_blank(&self.name),
            non_blank(&self.email),
            non_blank(&self.country),
            non_blank(&self.message),
        ) else {
            return Err(ValidationError::MissingFields);
        };

        // The relay must also be able to address a reply to it
        if !email_pattern().is_match(email) || email.parse::<Address>().is_err() {
            return Err(ValidationError::InvalidEmail);
        }

        let company = non_blank(&self.company);

        check_len("name", name, MAX_NAME_LEN)?;
        check_len("email", email, MAX_EMAIL_LEN)?;
        check_len("country", country, MAX_COUNTRY_LEN)?;
        check_len("message", message, MAX_MESSAGE_LEN)?;
        if let Some(company) = company {
            check_len("company", company, MAX_COMPANY_LEN)?;
        }

        Ok(Enquiry {
            name: escape_html(name),
            reply_name: name.to_string(),
            email: email.to_string(),
            company: company
                .map(escape_html)
                .unwrap_or_else(|| COMPANY_PLACEHOLDER.to_string()),
            country: escape_html(country),
            message: escape_html(message),
            source_ip,
            submitted_at,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Escape the characters that are unsafe inside HTML text or attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
