//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod contact;
pub mod envelope;
pub mod meta;

pub use contact::send_email;
pub use meta::{health, root};
