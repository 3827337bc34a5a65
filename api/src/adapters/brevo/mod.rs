//! Brevo HTTP API adapter

pub mod client;

pub use client::BrevoRelay;
