//! Test doubles shared by unit and integration tests.

mod clock;
mod services;

pub use clock::MutableClock;
pub use services::{InMemoryHarness, in_memory_harness};
