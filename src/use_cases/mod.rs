//! Use cases (orchestration)
//!
//! This module contains use cases that orchestrate operations across the store ports.
//! Use cases coordinate between adapters and logic to fulfill caller requests.

mod key_lifecycle;
mod sign_and_encode;

pub use key_lifecycle::KeyLifecycleManager;
pub use sign_and_encode::sign_and_encode;
