//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: the enquiry, its validation, and the mail rendered from it
//! - `ports`: Trait definitions for external dependencies

pub mod entities;
pub mod ports;
