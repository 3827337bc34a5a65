//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod relay;

pub use relay::EmailRelay;
#[cfg(test)]
pub use relay::MockEmailRelay;
