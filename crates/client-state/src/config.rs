//! Codec and edition configuration.

use std::sync::Arc;
use std::time::Duration;

use client_state_core::{
    CipherTransform, Edition, Editions, MacAlgorithm, SecretKey, StaticKeySource, Tid,
};
use serde::Deserialize;

use crate::error::{Result, StateError};

/// How long a token stays valid: 30 minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// How far in the future a token's timestamp may lie.
pub const DEFAULT_MAX_CLOCK_SKEW: Duration = Duration::from_secs(30);

/// Configuration for the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateConfig {
    /// Maximum token age. A token exactly this old is still accepted.
    pub timeout: Duration,
    /// Maximum amount a token's timestamp may lead the local clock.
    pub max_clock_skew: Duration,
    /// Mark persisted cookies `HttpOnly`.
    pub http_only: bool,
    /// Set `Max-Age` on persisted cookies to the timeout.
    pub set_max_age: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_clock_skew: DEFAULT_MAX_CLOCK_SKEW,
            http_only: false,
            set_max_age: true,
        }
    }
}

impl StateConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_clock_skew(mut self, skew: Duration) -> Self {
        self.max_clock_skew = skew;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_max_age(mut self, set_max_age: bool) -> Self {
        self.set_max_age = set_max_age;
        self
    }
}

/// Serialized form of an edition, with hex-encoded keys.
///
/// ```json
/// {
///   "tid": 1,
///   "cipher": "AES/CBC/PKCS5Padding",
///   "mac": "HmacSHA256",
///   "encryption_key": "000102030405060708090a0b0c0d0e0f",
///   "authentication_key": "..."
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EditionConfig {
    pub tid: u64,
    #[serde(default = "default_cipher")]
    pub cipher: CipherTransform,
    #[serde(default = "default_mac")]
    pub mac: MacAlgorithm,
    pub encryption_key: String,
    pub authentication_key: String,
}

fn default_cipher() -> CipherTransform {
    CipherTransform::AesCbcPkcs7
}

fn default_mac() -> MacAlgorithm {
    MacAlgorithm::HmacSha256
}

impl TryFrom<EditionConfig> for Edition {
    type Error = StateError;

    fn try_from(config: EditionConfig) -> Result<Self> {
        let encryption_key = SecretKey::from_hex(&config.encryption_key).map_err(|e| {
            StateError::Configuration(format!(
                "edition {:x}: encryption key is not hex: {e}",
                config.tid
            ))
        })?;
        let authentication_key = SecretKey::from_hex(&config.authentication_key).map_err(|e| {
            StateError::Configuration(format!(
                "edition {:x}: authentication key is not hex: {e}",
                config.tid
            ))
        })?;

        Ok(Edition::new(
            Tid::new(config.tid),
            config.cipher,
            config.mac,
            Arc::new(StaticKeySource::new(authentication_key, encryption_key)),
        )?)
    }
}

/// Serialized form of an [`Editions`] set.
#[derive(Debug, Clone, Deserialize)]
pub struct EditionsConfig {
    pub current: EditionConfig,
    #[serde(default)]
    pub previous: Vec<EditionConfig>,
}

impl TryFrom<EditionsConfig> for Editions {
    type Error = StateError;

    fn try_from(config: EditionsConfig) -> Result<Self> {
        let mut editions = Editions::new(Edition::try_from(config.current)?);
        for previous in config.previous {
            editions = editions.with_previous(Edition::try_from(previous)?);
        }
        Ok(editions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const ENC: &str = "000102030405060708090a0b0c0d0e0f";
    const AUTH: &str = "101112131415161718191a1b1c1d1e1f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_default_config() {
        let config = StateConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(1800));
        assert_eq!(config.max_clock_skew, Duration::from_secs(30));
        assert!(!config.http_only);
        assert!(config.set_max_age);
    }

    #[test]
    fn test_edition_from_json() {
        let json = format!(
            r#"{{"tid": 255, "cipher": "AES/CBC/PKCS5Padding", "mac": "HmacSHA512",
                "encryption_key": "{ENC}", "authentication_key": "{AUTH}"}}"#
        );
        let config: EditionConfig = serde_json::from_str(&json).unwrap();
        let edition = Edition::try_from(config).unwrap();

        assert_eq!(edition.tid(), Tid::new(255));
        assert_eq!(edition.mac(), MacAlgorithm::HmacSha512);
        assert_eq!(edition.key_source().encryption_key().len(), 16);
    }

    #[test]
    fn test_edition_defaults_algorithms() {
        let json = format!(r#"{{"tid": 1, "encryption_key": "{ENC}", "authentication_key": "{AUTH}"}}"#);
        let config: EditionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.cipher, CipherTransform::AesCbcPkcs7);
        assert_eq!(config.mac, MacAlgorithm::HmacSha256);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let json = format!(
            r#"{{"tid": 1, "cipher": "DES", "encryption_key": "{ENC}", "authentication_key": "{AUTH}"}}"#
        );
        assert!(serde_json::from_str::<EditionConfig>(&json).is_err());
    }

    #[test]
    fn test_bad_keys_rejected() {
        let config = EditionConfig {
            tid: 1,
            cipher: CipherTransform::AesCbcPkcs7,
            mac: MacAlgorithm::HmacSha256,
            encryption_key: "not hex".into(),
            authentication_key: AUTH.into(),
        };
        let err = Edition::try_from(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let config = EditionConfig {
            tid: 1,
            cipher: CipherTransform::AesCbcPkcs7,
            mac: MacAlgorithm::HmacSha256,
            encryption_key: "0011".into(),
            authentication_key: AUTH.into(),
        };
        let err = Edition::try_from(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_editions_from_json() {
        let json = format!(
            r#"{{
                "current": {{"tid": 2, "encryption_key": "{ENC}", "authentication_key": "{AUTH}"}},
                "previous": [{{"tid": 1, "encryption_key": "{ENC}", "authentication_key": "{AUTH}"}}]
            }}"#
        );
        let config: EditionsConfig = serde_json::from_str(&json).unwrap();
        let editions = Editions::try_from(config).unwrap();

        assert_eq!(editions.current().tid(), Tid::new(2));
        assert_eq!(editions.len(), 2);
        assert!(editions.find(Tid::new(1)).is_ok());
    }
}
