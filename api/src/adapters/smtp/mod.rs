//! SMTP adapter
//!
//! Authenticated STARTTLS (or implicit TLS on port 465) relay via lettre.

pub mod transport;

pub use transport::SmtpRelay;
