//! Test fixtures and helpers.
//!
//! Common setup code for codec tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use client_state::{ClientSideState, Clock, Edition, IvSource, SecretKey, StateConfig, Tid};
use client_state_core::Iv;
use serde::{Deserialize, Serialize};

/// Timestamp new fixtures start at: 2023-11-14T22:13:20Z.
pub const FIXTURE_EPOCH: u64 = 1_700_000_000;

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self(Arc::new(AtomicU64::new(now)))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }

    /// Move the clock backwards, for skew tests.
    pub fn rewind(&self, secs: u64) {
        self.0.fetch_sub(secs, Ordering::SeqCst);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.get()
    }
}

/// Hands out the same IV every time.
#[derive(Debug, Clone, Copy)]
pub struct FixedIvSource(pub Iv);

impl IvSource for FixedIvSource {
    fn next_iv(&self) -> Iv {
        self.0
    }
}

/// A deterministic AES-128 / HmacSHA256 edition derived from `seed`.
pub fn fixed_edition(tid: u64, seed: u8) -> Edition {
    let auth: Vec<u8> = (0..32u8).map(|i| seed.wrapping_add(i)).collect();
    let enc: Vec<u8> = (0..16u8).map(|i| seed.wrapping_mul(31).wrapping_add(i)).collect();

    // Key lengths are fixed above, so this cannot fail
    Edition::aes_cbc_hmac_sha256(
        Tid::new(tid),
        SecretKey::from_bytes(auth),
        SecretKey::from_bytes(enc),
    )
    .expect("fixed edition keys are valid")
}

/// A structured record shaped like an OAuth credential flow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowState {
    pub provider_id: String,
    pub key: String,
    pub return_url: String,
}

impl FlowState {
    pub fn new(provider_id: &str, key: &str, return_url: &str) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            key: key.to_string(),
            return_url: return_url.to_string(),
        }
    }
}

/// A codec wired to a manual clock, with random IVs.
pub struct TestFixture {
    pub clock: ManualClock,
    pub state: ClientSideState,
}

impl TestFixture {
    /// A fixture on edition tid 1 starting at [`FIXTURE_EPOCH`].
    pub fn new() -> Self {
        Self::with_edition(fixed_edition(1, 0x10))
    }

    pub fn with_edition(edition: Edition) -> Self {
        Self::with_config(edition, StateConfig::default())
    }

    pub fn with_config(edition: Edition, config: StateConfig) -> Self {
        let clock = ManualClock::new(FIXTURE_EPOCH);
        let state = ClientSideState::with_config(edition, config).clock(clock.clone());
        Self { clock, state }
    }

    /// Persist `value` under `key` and return the cookie the client would send back.
    pub fn issue<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> client_state::Cookie {
        self.state
            .persist(key, "/", value)
            .expect("persist in fixture")
            .to_cookie()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
