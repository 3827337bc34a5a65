//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod brevo;
pub mod smtp;

pub use brevo::BrevoRelay;
pub use smtp::SmtpRelay;
