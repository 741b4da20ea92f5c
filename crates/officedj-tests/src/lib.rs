//! Office DJ End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the whole pipeline:
//!
//! - Derivation: text and path -> profile -> blueprint -> code
//! - Playback: session start guard, remix and teardown on the offline engine
//! - **Determinism**: identical input renders byte-identical PCM
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p officedj-tests
//! ```

pub mod determinism;
pub mod fixtures;
pub mod harness;

pub use determinism::{compute_hash, verify_determinism, DeterminismResult};
pub use fixtures::{Scenario, SCENARIOS};
pub use harness::{build_on, started_session, TEST_SAMPLE_RATE};
