//! # Client State
//!
//! Keep server-side state on the client, encrypted, signed and time-bounded,
//! typically as an HTTP cookie carried across an OAuth redirect.
//!
//! ## Overview
//!
//! [`ClientSideState`] serializes a value, encrypts it under the current
//! [`Edition`], timestamps and MACs the result, and packs it into a
//! cookie-safe token. Restoring reverses the pipeline and rejects anything
//! malformed, signed under unknown keys, tampered with, or stale.
//!
//! ## Usage
//!
//! ```rust
//! use client_state::{ClientSideState, Cookie, Edition, SecretKey, Tid};
//!
//! let edition = Edition::aes_cbc_hmac_sha256(
//!     Tid::new(1),
//!     SecretKey::generate(32),
//!     SecretKey::generate(16),
//! )
//! .unwrap();
//! let state = ClientSideState::new(edition);
//!
//! let cookie = state.persist("cred-o2-github", "/", "return-url").unwrap();
//! let restored: String = state.restore_from(&cookie.to_cookie()).unwrap();
//! assert_eq!(restored, "return-url");
//! ```
//!
//! ## Re-exports
//!
//! - `client_state::core` - Editions, keys, algorithms and the wire format
//! - `client_state::http` - Cookie types

pub mod codec;
pub mod config;
pub mod error;
pub mod serialization;
pub mod source;

// Re-export component crates
pub use client_state_core as core;
pub use client_state_http as http;

pub use codec::{ClientSideState, Timestamped};
pub use config::{
    EditionConfig, EditionsConfig, StateConfig, DEFAULT_MAX_CLOCK_SKEW, DEFAULT_TIMEOUT,
};
pub use error::{ErrorKind, Result, StateError};
pub use serialization::{CborSerializer, JsonSerializer, StateSerializer};
pub use source::{Clock, IvSource, RandomIvSource, SystemClock};

// Re-export commonly used component types
pub use client_state_core::{
    CipherTransform, Edition, Editions, Iv, KeySource, MacAlgorithm, SecretKey, StaticKeySource,
    Tid,
};
pub use client_state_http::{parse_cookie_header, Cookie, NewCookie};
