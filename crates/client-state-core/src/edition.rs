//! Editions: versioned cryptographic parameters.
//!
//! An edition bundles a [`Tid`], a cipher transform, a MAC algorithm and a
//! key source. Tokens carry the tid of the edition that produced them, so
//! several editions can be live at once while keys are rotated: new tokens
//! are always produced under the current edition, and older editions stay
//! around for decoding only until their tokens have aged out.

use std::fmt;
use std::sync::Arc;

use crate::crypto::{CipherTransform, MacAlgorithm};
use crate::error::{CoreError, Result};
use crate::types::{Iv, SecretKey, Tid};

/// Supplies the keys of an edition.
pub trait KeySource: Send + Sync {
    /// Key for the MAC.
    fn authentication_key(&self) -> &SecretKey;

    /// Key for the cipher.
    fn encryption_key(&self) -> &SecretKey;
}

/// A key source holding both keys in memory.
#[derive(Debug, Clone)]
pub struct StaticKeySource {
    authentication_key: SecretKey,
    encryption_key: SecretKey,
}

impl StaticKeySource {
    pub fn new(authentication_key: SecretKey, encryption_key: SecretKey) -> Self {
        Self {
            authentication_key,
            encryption_key,
        }
    }

    /// Generate random keys: 32 bytes for authentication, `encryption_key_len` for the cipher.
    pub fn generate(encryption_key_len: usize) -> Self {
        Self::new(
            SecretKey::generate(32),
            SecretKey::generate(encryption_key_len),
        )
    }
}

impl KeySource for StaticKeySource {
    fn authentication_key(&self) -> &SecretKey {
        &self.authentication_key
    }

    fn encryption_key(&self) -> &SecretKey {
        &self.encryption_key
    }
}

/// A versioned bundle of cryptographic parameters.
#[derive(Clone)]
pub struct Edition {
    tid: Tid,
    cipher: CipherTransform,
    mac: MacAlgorithm,
    keys: Arc<dyn KeySource>,
}

impl Edition {
    /// Create an edition, checking the keys against the algorithms.
    pub fn new(
        tid: Tid,
        cipher: CipherTransform,
        mac: MacAlgorithm,
        keys: Arc<dyn KeySource>,
    ) -> Result<Self> {
        cipher.check_key(keys.encryption_key().as_bytes())?;
        mac.check_key(keys.authentication_key().as_bytes())?;

        Ok(Self {
            tid,
            cipher,
            mac,
            keys,
        })
    }

    /// AES/CBC/PKCS5Padding with HmacSHA256 over static keys.
    pub fn aes_cbc_hmac_sha256(
        tid: Tid,
        authentication_key: SecretKey,
        encryption_key: SecretKey,
    ) -> Result<Self> {
        Self::new(
            tid,
            CipherTransform::AesCbcPkcs7,
            MacAlgorithm::HmacSha256,
            Arc::new(StaticKeySource::new(authentication_key, encryption_key)),
        )
    }

    pub fn tid(&self) -> Tid {
        self.tid
    }

    pub fn cipher(&self) -> CipherTransform {
        self.cipher
    }

    pub fn mac(&self) -> MacAlgorithm {
        self.mac
    }

    pub fn key_source(&self) -> &dyn KeySource {
        self.keys.as_ref()
    }

    /// Encrypt under this edition's cipher and encryption key.
    pub fn encrypt(&self, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.cipher
            .encrypt(self.keys.encryption_key().as_bytes(), iv, plaintext)
    }

    /// Decrypt under this edition's cipher and encryption key.
    pub fn decrypt(&self, iv: &Iv, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.cipher
            .decrypt(self.keys.encryption_key().as_bytes(), iv, ciphertext)
    }

    /// MAC `data` under this edition's algorithm and authentication key.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.mac
            .compute(self.keys.authentication_key().as_bytes(), data)
    }

    /// Constant-time check of `tag` over `data`.
    pub fn verify(&self, data: &[u8], tag: &[u8]) -> Result<bool> {
        self.mac
            .verify(self.keys.authentication_key().as_bytes(), data, tag)
    }
}

impl fmt::Debug for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edition")
            .field("tid", &self.tid)
            .field("cipher", &self.cipher)
            .field("mac", &self.mac)
            .finish_non_exhaustive()
    }
}

/// The editions known to a codec.
///
/// Encoding always uses [`Editions::current`]. Decoding searches the
/// current edition first, then the decode-only editions in order; the first
/// tid match wins.
#[derive(Debug, Clone)]
pub struct Editions {
    current: Edition,
    previous: Vec<Edition>,
}

impl Editions {
    /// A single edition used for both encoding and decoding.
    pub fn new(current: Edition) -> Self {
        Self {
            current,
            previous: Vec::new(),
        }
    }

    /// Keep `edition` around for decoding only.
    pub fn with_previous(mut self, edition: Edition) -> Self {
        self.previous.push(edition);
        self
    }

    /// Start encoding under `next`, demoting the current edition to decode-only.
    pub fn rotate(self, next: Edition) -> Self {
        let mut previous = Vec::with_capacity(self.previous.len() + 1);
        previous.push(self.current);
        previous.extend(self.previous);

        Self {
            current: next,
            previous,
        }
    }

    /// Drop a decode-only edition once its tokens can no longer be fresh.
    pub fn retire(mut self, tid: Tid) -> Self {
        self.previous.retain(|e| e.tid() != tid);
        self
    }

    pub fn current(&self) -> &Edition {
        &self.current
    }

    /// All editions in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &Edition> {
        std::iter::once(&self.current).chain(self.previous.iter())
    }

    /// Find the edition for `tid`.
    pub fn find(&self, tid: Tid) -> Result<&Edition> {
        self.iter()
            .find(|e| e.tid() == tid)
            .ok_or(CoreError::UnknownEdition(tid))
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        1 + self.previous.len()
    }
}

impl From<Edition> for Editions {
    fn from(current: Edition) -> Self {
        Self::new(current)
    }
}
