//! # Client State Core
//!
//! Pure primitives for keeping server state on the client: editions, keys,
//! ciphers, MACs and the token wire format.
//!
//! This crate contains no I/O and knows nothing about HTTP or value
//! serialization. It is pure computation over byte strings.
//!
//! ## Key Types
//!
//! - [`Edition`] - A versioned bundle of cryptographic parameters
//! - [`Editions`] - The current edition plus decode-only editions kept for key rotation
//! - [`Tid`] - The 64-bit identifier that ties a token to its edition
//! - [`StatePacket`] - The decoded form of a token
//!
//! ## Wire Format
//!
//! A token is five base64url (unpadded) fields separated by `|`:
//!
//! ```text
//! IV | timestamp | tid | ciphertext | mac
//! ```
//!
//! The MAC covers `tid (8 bytes BE) || timestamp (ASCII) || IV || ciphertext`.
//! See the [`packet`] module.

pub mod base64url;
pub mod crypto;
pub mod edition;
pub mod error;
pub mod packet;
pub mod types;

pub use crypto::{CipherTransform, MacAlgorithm};
pub use edition::{Edition, Editions, KeySource, StaticKeySource};
pub use error::{CoreError, Result};
pub use packet::{StatePacket, FIELD_COUNT, FIELD_SEPARATOR};
pub use types::{Iv, SecretKey, Tid, IV_LEN, TID_LEN};
