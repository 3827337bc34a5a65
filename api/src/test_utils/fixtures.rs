//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid value that can be customized.

use std::net::{IpAddr, Ipv4Addr};

use chrono::{FixedOffset, TimeZone, Utc};

use crate::config::MailboxConfig;
use crate::domain::entities::{Enquiry, EnquiryForm};

/// A complete, valid contact-form submission
pub fn test_form() -> EnquiryForm {
    EnquiryForm {
        name: Some("Asha Rao".to_string()),
        email: Some("asha@example.com".to_string()),
        company: Some("Rao Distributors".to_string()),
        country: Some("India".to_string()),
        message: Some("We would like a price list for your paracetamol range.".to_string()),
        website: None,
    }
}

/// The validated form of `test_form()`, stamped 2026-03-02T06:30:00Z
pub fn test_enquiry() -> Enquiry {
    Enquiry {
        name: "Asha Rao".to_string(),
        reply_name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        company: "Rao Distributors".to_string(),
        country: "India".to_string(),
        message: "We would like a price list for your paracetamol range.".to_string(),
        source_ip: IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)),
        submitted_at: Utc.with_ymd_and_hms(2026, 3, 2, 6, 30, 0).unwrap(),
    }
}

pub fn test_mailbox() -> MailboxConfig {
    MailboxConfig {
        sender_name: "Karlin Pharmaceuticals Website".to_string(),
        sender_email: "noreply@karlinpharmaceuticals.com".to_string(),
        recipient: "info@karlinpharmaceuticals.com".to_string(),
        company_name: "Karlin Pharmaceuticals".to_string(),
        utc_offset: FixedOffset::east_opt(330 * 60).unwrap(),
    }
}
