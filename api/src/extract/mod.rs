//! Request extractors
//!
//! Pull the caller's IP and the enquiry payload out of incoming requests.

pub mod client_ip;
pub mod payload;

pub use client_ip::ClientIp;
pub use payload::EnquiryPayload;
