//! # Client State Testkit
//!
//! Testing utilities for client-side state.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed inputs with the exact tokens they must produce
//! - **Generators**: Proptest strategies for state values and editions
//! - **Fixtures**: A manual clock, a fixed IV source and ready-made codecs
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the wire format byte for byte:
//!
//! ```rust
//! use client_state_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, token) in verify_all_vectors() {
//!     assert!(matches, "{name}: {token}");
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use client_state_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let cookie = fixture.state.persist("k", "/", "value").unwrap();
//! fixture.clock.advance(60);
//! let restored: String = fixture.state.restore_from(&cookie.to_cookie()).unwrap();
//! assert_eq!(restored, "value");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    fixed_edition, FixedIvSource, FlowState, ManualClock, TestFixture, FIXTURE_EPOCH,
};
pub use generators::{EditionParams, StateValue};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
