//! Strong type definitions for client state tokens.
//!
//! Identifiers and key material are newtypes so they cannot be mixed up.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the tid field on the wire.
pub const TID_LEN: usize = 8;

/// Length of the initialization vector (one AES block).
pub const IV_LEN: usize = 16;

/// A 64-bit edition identifier.
///
/// Carried in every token so the decoder can pick the edition that
/// produced it. Encoded on the wire as 8 bytes big-endian.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tid(pub u64);

impl Tid {
    /// Create from a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw identifier.
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Wire encoding (big-endian).
    pub const fn to_bytes(&self) -> [u8; TID_LEN] {
        self.0.to_be_bytes()
    }

    /// Parse from wire encoding.
    pub const fn from_bytes(bytes: [u8; TID_LEN]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Debug for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tid({:#018x})", self.0)
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl From<u64> for Tid {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl TryFrom<&[u8]> for Tid {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; TID_LEN] = slice.try_into()?;
        Ok(Self::from_bytes(arr))
    }
}

/// A 128-bit initialization vector.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Iv(pub [u8; IV_LEN]);

impl Iv {
    /// Generate a fresh IV from the operating system's CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; IV_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; IV_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }
}

impl fmt::Debug for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iv({})", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for Iv {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Iv {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; IV_LEN] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// Raw symmetric key material.
///
/// `Debug` never prints the key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        Ok(Self(hex::decode(s)?))
    }

    /// Generate a random key of `len` bytes.
    pub fn generate(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({} bytes)", self.0.len())
    }
}
