//! Test utilities
//!
//! Fixtures and a hand-rolled relay double for unit and router tests.
//! Service tests that need call expectations use the mockall-generated
//! `MockEmailRelay`; router tests use `StubRelay`, which can be shared
//! behind an `Arc` and inspected after the request.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
