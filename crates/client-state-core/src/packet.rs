//! Token wire format.
//!
//! A token is the five fields of a [`StatePacket`], each base64url encoded
//! without padding, joined by `|` in this fixed order:
//!
//! ```text
//! IV | timestamp | tid | ciphertext | mac
//! ```
//!
//! The timestamp field carries the decimal ASCII text of the issue time in
//! UTC seconds. The MAC covers
//! `tid (8 bytes BE) || timestamp text || IV || ciphertext`.
//!
//! The tid and IV have fixed lengths and CBC ciphertext is block aligned, so
//! bytes cannot be shifted between the variable-length timestamp and the
//! neighbouring fields without breaking one of those length checks.

use crate::base64url::{base64url_decode, base64url_encode};
use crate::edition::Edition;
use crate::error::{CoreError, Result};
use crate::types::{Iv, Tid, IV_LEN, TID_LEN};

/// Separator between token fields. Never produced by base64url.
pub const FIELD_SEPARATOR: char = '|';

/// Number of fields in a token.
pub const FIELD_COUNT: usize = 5;

/// Longest accepted timestamp text (u64::MAX has 20 digits).
///
/// The MAC covers the re-rendered text, so only the canonical rendering
/// (no sign, no leading zeros) is accepted.
const MAX_TIMESTAMP_DIGITS: usize = 20;

/// The decoded form of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePacket {
    pub iv: Iv,
    /// Issue time in UTC seconds.
    pub timestamp: u64,
    pub tid: Tid,
    pub ciphertext: Vec<u8>,
    pub mac: Vec<u8>,
}

impl StatePacket {
    /// Encrypt and sign `plaintext` under `edition`.
    pub fn seal(edition: &Edition, iv: Iv, timestamp: u64, plaintext: &[u8]) -> Result<Self> {
        let ciphertext = edition.encrypt(&iv, plaintext)?;

        let mut packet = Self {
            iv,
            timestamp,
            tid: edition.tid(),
            ciphertext,
            mac: Vec::new(),
        };
        packet.mac = edition.sign(&packet.mac_input())?;

        Ok(packet)
    }

    /// Bytes covered by the MAC.
    pub fn mac_input(&self) -> Vec<u8> {
        let timestamp = self.timestamp_text();
        let mut buf =
            Vec::with_capacity(TID_LEN + timestamp.len() + IV_LEN + self.ciphertext.len());
        buf.extend_from_slice(&self.tid.to_bytes());
        buf.extend_from_slice(timestamp.as_bytes());
        buf.extend_from_slice(self.iv.as_bytes());
        buf.extend_from_slice(&self.ciphertext);
        buf
    }

    /// Check the MAC under `edition`.
    ///
    /// The edition must be the one matching this packet's tid.
    pub fn verify(&self, edition: &Edition) -> Result<bool> {
        if edition.tid() != self.tid {
            return Ok(false);
        }
        edition.verify(&self.mac_input(), &self.mac)
    }

    /// Decrypt the ciphertext under `edition`.
    ///
    /// Call [`StatePacket::verify`] first; this does not authenticate.
    pub fn open(&self, edition: &Edition) -> Result<Vec<u8>> {
        edition.decrypt(&self.iv, &self.ciphertext)
    }

    /// Encode to the token string.
    pub fn encode(&self) -> String {
        let fields = [
            base64url_encode(self.iv.as_bytes()),
            base64url_encode(self.timestamp_text().as_bytes()),
            base64url_encode(&self.tid.to_bytes()),
            base64url_encode(&self.ciphertext),
            base64url_encode(&self.mac),
        ];
        fields.join("|")
    }

    /// Parse a token string.
    ///
    /// Checks shape only; the MAC is not verified here.
    pub fn parse(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.split(FIELD_SEPARATOR).collect();
        if parts.len() != FIELD_COUNT {
            return Err(CoreError::Format(format!(
                "expected {FIELD_COUNT} fields, got {}",
                parts.len()
            )));
        }

        let iv = decode_field("iv", parts[0])?;
        let timestamp = decode_field("timestamp", parts[1])?;
        let tid = decode_field("tid", parts[2])?;
        let ciphertext = decode_field("ciphertext", parts[3])?;
        let mac = decode_field("mac", parts[4])?;

        let iv = Iv::try_from(iv.as_slice()).map_err(|_| {
            CoreError::Format(format!("iv must be {IV_LEN} bytes, got {}", iv.len()))
        })?;
        let tid = Tid::try_from(tid.as_slice()).map_err(|_| {
            CoreError::Format(format!("tid must be {TID_LEN} bytes, got {}", tid.len()))
        })?;
        let timestamp = parse_timestamp(&timestamp)?;

        if ciphertext.is_empty() {
            return Err(CoreError::Format("empty ciphertext".to_string()));
        }
        if mac.is_empty() {
            return Err(CoreError::Format("empty mac".to_string()));
        }

        Ok(Self {
            iv,
            timestamp,
            tid,
            ciphertext,
            mac,
        })
    }

    fn timestamp_text(&self) -> String {
        self.timestamp.to_string()
    }
}

fn decode_field(name: &str, field: &str) -> Result<Vec<u8>> {
    base64url_decode(field)
        .map_err(|e| CoreError::Format(format!("{name} field is not base64url: {e}")))
}

fn parse_timestamp(bytes: &[u8]) -> Result<u64> {
    if bytes.is_empty()
        || bytes.len() > MAX_TIMESTAMP_DIGITS
        || !bytes.iter().all(u8::is_ascii_digit)
        || (bytes.len() > 1 && bytes[0] == b'0')
    {
        return Err(CoreError::Format(
            "timestamp is not a canonical decimal number".to_string(),
        ));
    }

    // All ASCII digits, so this is valid UTF-8
    let text = std::str::from_utf8(bytes)
        .map_err(|_| CoreError::Format("timestamp is not ASCII".to_string()))?;
    text.parse::<u64>()
        .map_err(|e| CoreError::Format(format!("timestamp out of range: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SecretKey;

    fn edition() -> Edition {
        Edition::aes_cbc_hmac_sha256(
            Tid::new(0x1122_3344_5566_7788),
            SecretKey::from_bytes(vec![0x01; 32]),
            SecretKey::from_bytes(vec![0x02; 16]),
        )
        .unwrap()
    }

    fn sealed() -> StatePacket {
        StatePacket::seal(
            &edition(),
            Iv::from_bytes([0x03; IV_LEN]),
            1_700_000_000,
            b"\"state\"",
        )
        .unwrap()
    }

    #[test]
    fn test_seal_verify_open() {
        let e = edition();
        let packet = sealed();

        assert!(packet.verify(&e).unwrap());
        assert_eq!(packet.open(&e).unwrap(), b"\"state\"");
    }

    #[test]
    fn test_encode_parse_roundtrip() {
        let packet = sealed();
        let token = packet.encode();

        assert_eq!(token.split('|').count(), FIELD_COUNT);
        assert_eq!(StatePacket::parse(&token).unwrap(), packet);
    }

    #[test]
    fn test_field_order() {
        let packet = sealed();
        let token = packet.encode();
        let fields: Vec<&str> = token.split('|').collect();

        assert_eq!(base64url_decode(fields[0]).unwrap(), vec![0x03; IV_LEN]);
        assert_eq!(base64url_decode(fields[1]).unwrap(), b"1700000000");
        assert_eq!(
            base64url_decode(fields[2]).unwrap(),
            vec![0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]
        );
        assert_eq!(base64url_decode(fields[3]).unwrap(), packet.ciphertext);
        assert_eq!(base64url_decode(fields[4]).unwrap(), packet.mac);
    }

    #[test]
    fn test_mac_input_layout() {
        let packet = sealed();
        let input = packet.mac_input();

        assert_eq!(&input[..TID_LEN], &packet.tid.to_bytes());
        assert_eq!(&input[TID_LEN..TID_LEN + 10], b"1700000000");
        assert_eq!(&input[TID_LEN + 10..TID_LEN + 10 + IV_LEN], &[0x03; IV_LEN]);
        assert_eq!(&input[TID_LEN + 10 + IV_LEN..], packet.ciphertext.as_slice());
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let token = sealed().encode();

        for bad in [
            String::new(),
            "abc".to_string(),
            format!("{token}|extra"),
            token.rsplit_once('|').unwrap().0.to_string(),
        ] {
            assert!(matches!(
                StatePacket::parse(&bad),
                Err(CoreError::Format(_))
            ));
        }
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        let token = sealed().encode().replacen('|', "=|", 1);
        assert!(matches!(
            StatePacket::parse(&token),
            Err(CoreError::Format(_))
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_lengths() {
        let packet = sealed();
        let fields: Vec<String> = packet.encode().split('|').map(String::from).collect();

        let mut short_iv = fields.clone();
        short_iv[0] = base64url_encode(&[0u8; 15]);
        assert!(StatePacket::parse(&short_iv.join("|")).is_err());

        let mut long_tid = fields.clone();
        long_tid[2] = base64url_encode(&[0u8; 9]);
        assert!(StatePacket::parse(&long_tid.join("|")).is_err());

        let mut empty_ct = fields;
        empty_ct[3] = String::new();
        assert!(StatePacket::parse(&empty_ct.join("|")).is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_timestamp() {
        let packet = sealed();
        let mut fields: Vec<String> = packet.encode().split('|').map(String::from).collect();

        for bad in [&b""[..], b"-5", b"12a", b" 12", b"+12", b"017", b"123456789012345678901"] {
            fields[1] = base64url_encode(bad);
            assert!(
                matches!(StatePacket::parse(&fields.join("|")), Err(CoreError::Format(_))),
                "accepted timestamp {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_verify_rejects_other_edition() {
        let packet = sealed();
        let other = Edition::aes_cbc_hmac_sha256(
            Tid::new(0x1122_3344_5566_7788),
            SecretKey::from_bytes(vec![0x09; 32]),
            SecretKey::from_bytes(vec![0x02; 16]),
        )
        .unwrap();

        assert!(!packet.verify(&other).unwrap());
    }

    #[test]
    fn test_verify_detects_timestamp_change() {
        let e = edition();
        let mut packet = sealed();
        packet.timestamp += 1;
        assert!(!packet.verify(&e).unwrap());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_parse_never_panics(token in "[A-Za-z0-9_|=-]{0,200}") {
                let _ = StatePacket::parse(&token);
            }

            #[test]
            fn test_any_timestamp_survives_encoding(
                timestamp: u64,
                iv: [u8; IV_LEN],
                plaintext in prop::collection::vec(any::<u8>(), 0..64),
            ) {
                let e = edition();
                let packet = StatePacket::seal(&e, Iv::from_bytes(iv), timestamp, &plaintext).unwrap();
                let parsed = StatePacket::parse(&packet.encode()).unwrap();

                prop_assert_eq!(parsed.timestamp, timestamp);
                prop_assert!(parsed.verify(&e).unwrap());
                prop_assert_eq!(parsed.open(&e).unwrap(), plaintext);
            }
        }
    }
}
