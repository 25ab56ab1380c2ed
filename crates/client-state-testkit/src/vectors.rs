//! Golden test vectors for the token wire format.
//!
//! Each vector fixes the edition, IV, clock and serialized value, and pins
//! the exact token that must come out. The expected tokens were computed
//! with an independent AES-CBC/HMAC implementation.

use std::sync::Arc;

use client_state::{
    CipherTransform, ClientSideState, Edition, Iv, MacAlgorithm, SecretKey, StaticKeySource, Tid,
};

use crate::fixtures::{FixedIvSource, FlowState, ManualClock};
use crate::generators::StateValue;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub tid: u64,
    pub mac: MacAlgorithm,
    /// Authentication key (hex).
    pub authentication_key: &'static str,
    /// Encryption key (hex). Its length selects the AES variant.
    pub encryption_key: &'static str,
    /// IV (hex).
    pub iv: &'static str,
    /// Issue time in UTC seconds.
    pub timestamp: u64,
    pub value: StateValue,
    /// `value` exactly as the JSON serializer renders it.
    pub plaintext: &'static str,
    /// Expected token.
    pub expected_token: &'static str,
}

impl GoldenVector {
    pub fn edition(&self) -> Edition {
        Edition::new(
            Tid::new(self.tid),
            CipherTransform::AesCbcPkcs7,
            self.mac,
            Arc::new(StaticKeySource::new(
                SecretKey::from_hex(self.authentication_key).expect("vector key is hex"),
                SecretKey::from_hex(self.encryption_key).expect("vector key is hex"),
            )),
        )
        .expect("vector keys are valid")
    }

    pub fn iv(&self) -> Iv {
        let bytes = hex::decode(self.iv).expect("vector iv is hex");
        Iv::try_from(bytes.as_slice()).expect("vector iv is 16 bytes")
    }

    /// A codec pinned to this vector's edition, IV and timestamp.
    pub fn state(&self) -> ClientSideState {
        ClientSideState::new(self.edition())
            .clock(ManualClock::new(self.timestamp))
            .iv_source(FixedIvSource(self.iv()))
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "string with AES-128 and HmacSHA256",
            tid: 1,
            mac: MacAlgorithm::HmacSha256,
            authentication_key: "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
            encryption_key: "202122232425262728292a2b2c2d2e2f",
            iv: "404142434445464748494a4b4c4d4e4f",
            timestamp: 1_700_000_000, // 2023-11-14T22:13:20Z
            value: StateValue::Text("a state string".to_string()),
            plaintext: r#""a state string""#,
            expected_token: "QEFCQ0RFRkdISUpLTE1OTw|MTcwMDAwMDAwMA|AAAAAAAAAAE|\
                syXgy0OghUG2mrKcTIkcvPAAH0Zj5DO6pYAHuzlVX0c|\
                -zpIy-HCUz8UC6AyUG0gfE-_vOANvzMr70skdoAhrm8",
        },
        GoldenVector {
            name: "string map with AES-256 and HmacSHA512",
            tid: 0xDEAD_BEEF,
            mac: MacAlgorithm::HmacSha512,
            authentication_key: "a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5\
                                 a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5",
            encryption_key: "606162636465666768696a6b6c6d6e6f707172737475767778797a7b7c7d7e7f",
            iv: "00000000000000000000000000000000",
            timestamp: 1_234_567_890,
            value: StateValue::Map(
                [("k1", "v1"), ("k2", "v2")]
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            plaintext: r#"{"k1":"v1","k2":"v2"}"#,
            expected_token: "AAAAAAAAAAAAAAAAAAAAAA|MTIzNDU2Nzg5MA|AAAAAN6tvu8|\
                WyvZCc4qJRZXtCikvkteGWs5qqB5NwvvvOLYpYE81es|\
                REKspWTXF908w6y3FPP0oaMGWA_KQGFpFOpf_WSQ_qCUMJd0QxFv8ZBmLeCjXA6MY2o_mImaOhznSMtos-hlyQ",
        },
        GoldenVector {
            name: "record with AES-192 and HmacSHA384",
            tid: 0x0123_4567_89AB_CDEF,
            mac: MacAlgorithm::HmacSha384,
            // "syndesis-auth-key"
            authentication_key: "73796e64657369732d617574682d6b6579",
            encryption_key: "808182838485868788898a8b8c8d8e8f9091929394959697",
            iv: "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff",
            timestamp: 1,
            value: StateValue::Record(FlowState::new("github", "8f1c", "/ui#state")),
            plaintext: r#"{"provider_id":"github","key":"8f1c","return_url":"/ui#state"}"#,
            expected_token: "8PHy8_T19vf4-fr7_P3-_w|MQ|ASNFZ4mrze8|\
                MefsmdtXU2h05L7uhMSblU57DPFYQVx7lWzR8KzkJFXj0lAEOuYTbMyFPCm85-k6o7Ymy9_puiaxVJpg2o8i1w|\
                B_qBy9FL0j8xb04Gsn7TQnuhHMWwDYCvFZWyzP2u969-lUxGlMm9d5ZmQCkrhBSJ",
        },
    ]
}

/// Seal every vector's value and compare against the expected token.
///
/// Returns `(name, matches, produced_token)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let token = v.value.protect(&v.state()).expect("vector seals");
            (v.name.to_string(), token == v.expected_token, token)
        })
        .collect()
}
