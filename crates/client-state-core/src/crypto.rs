//! Cryptographic primitives for client state tokens.
//!
//! Wraps AES-CBC encryption and HMAC authentication behind named
//! algorithms, so an edition can carry the algorithm as data.

use std::fmt;
use std::str::FromStr;

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::error::{CoreError, Result};
use crate::types::{Iv, IV_LEN};

/// AES block size in bytes. CBC ciphertext is always a multiple of this.
pub const BLOCK_LEN: usize = 16;

/// A named symmetric cipher transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CipherTransform {
    /// AES in CBC mode with PKCS#7 padding (`AES/CBC/PKCS5Padding`).
    ///
    /// Key length picks AES-128, AES-192 or AES-256.
    AesCbcPkcs7,
}

impl CipherTransform {
    /// Canonical transform name.
    pub const fn name(&self) -> &'static str {
        match self {
            CipherTransform::AesCbcPkcs7 => "AES/CBC/PKCS5Padding",
        }
    }

    /// IV length required by this transform.
    pub const fn iv_len(&self) -> usize {
        match self {
            CipherTransform::AesCbcPkcs7 => IV_LEN,
        }
    }

    /// Check that `key` is usable with this transform.
    pub fn check_key(&self, key: &[u8]) -> Result<()> {
        match self {
            CipherTransform::AesCbcPkcs7 => match key.len() {
                16 | 24 | 32 => Ok(()),
                other => Err(CoreError::InvalidKey(format!(
                    "{} needs a 16, 24 or 32 byte key, got {other}",
                    self.name()
                ))),
            },
        }
    }

    /// Encrypt `plaintext` under `key` and `iv`.
    pub fn encrypt(&self, key: &[u8], iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>> {
        let iv = iv.as_bytes();
        let invalid = |e: cbc::cipher::InvalidLength| CoreError::Encryption(e.to_string());

        match self {
            CipherTransform::AesCbcPkcs7 => match key.len() {
                16 => Ok(cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
                24 => Ok(cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
                32 => Ok(cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
                other => Err(CoreError::InvalidKey(format!("unusable AES key length {other}"))),
            },
        }
    }

    /// Decrypt `ciphertext` under `key` and `iv`.
    ///
    /// Fails on bad padding, which is what a wrong key or IV usually yields.
    pub fn decrypt(&self, key: &[u8], iv: &Iv, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let iv = iv.as_bytes();
        let invalid = |e: cbc::cipher::InvalidLength| CoreError::Decryption(e.to_string());
        let unpad = |_| CoreError::Decryption("bad padding".to_string());

        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CoreError::Decryption(format!(
                "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
                ciphertext.len()
            )));
        }

        match self {
            CipherTransform::AesCbcPkcs7 => match key.len() {
                16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(unpad),
                24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(unpad),
                32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(unpad),
                other => Err(CoreError::InvalidKey(format!("unusable AES key length {other}"))),
            },
        }
    }
}

impl fmt::Display for CipherTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherTransform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AES/CBC/PKCS5PADDING" | "AES/CBC/PKCS7PADDING" => Ok(CipherTransform::AesCbcPkcs7),
            _ => Err(CoreError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for CipherTransform {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CipherTransform> for String {
    fn from(c: CipherTransform) -> Self {
        c.name().to_string()
    }
}

/// A named keyed MAC algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MacAlgorithm {
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

impl MacAlgorithm {
    /// Canonical algorithm name.
    pub const fn name(&self) -> &'static str {
        match self {
            MacAlgorithm::HmacSha256 => "HmacSHA256",
            MacAlgorithm::HmacSha384 => "HmacSHA384",
            MacAlgorithm::HmacSha512 => "HmacSHA512",
        }
    }

    /// Length of the produced tag.
    pub const fn tag_len(&self) -> usize {
        match self {
            MacAlgorithm::HmacSha256 => 32,
            MacAlgorithm::HmacSha384 => 48,
            MacAlgorithm::HmacSha512 => 64,
        }
    }

    /// Check that `key` is usable with this algorithm.
    pub fn check_key(&self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(CoreError::InvalidKey(format!(
                "{} needs a non-empty key",
                self.name()
            )));
        }
        Ok(())
    }

    /// Compute the tag over `data`.
    pub fn compute(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        let invalid = |e: hmac::digest::InvalidLength| CoreError::InvalidKey(e.to_string());

        let tag = match self {
            MacAlgorithm::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(invalid)?;
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            MacAlgorithm::HmacSha384 => {
                let mut mac = Hmac::<Sha384>::new_from_slice(key).map_err(invalid)?;
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            MacAlgorithm::HmacSha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(key).map_err(invalid)?;
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
        };

        Ok(tag)
    }

    /// Recompute the tag over `data` and compare it to `tag` in constant time.
    pub fn verify(&self, key: &[u8], data: &[u8], tag: &[u8]) -> Result<bool> {
        let calculated = self.compute(key, data)?;
        Ok(bool::from(calculated.as_slice().ct_eq(tag)))
    }
}

impl fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MacAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "HMACSHA256" => Ok(MacAlgorithm::HmacSha256),
            "HMACSHA384" => Ok(MacAlgorithm::HmacSha384),
            "HMACSHA512" => Ok(MacAlgorithm::HmacSha512),
            _ => Err(CoreError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for MacAlgorithm {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<MacAlgorithm> for String {
    fn from(m: MacAlgorithm) -> Self {
        m.name().to_string()
    }
}
