//! Domain entities
//!
//! Pure domain models for a contact-form submission. An enquiry lives for a
//! single request and is never persisted.

pub mod enquiry;
pub mod mail;

pub use enquiry::{Enquiry, EnquiryForm};
pub use mail::{EnquiryMail, MessageId};
