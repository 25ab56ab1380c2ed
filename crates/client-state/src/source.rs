//! Injectable time and IV sources.
//!
//! The codec never reads the clock or the RNG directly, so tests can pin
//! both and get byte-exact tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use client_state_core::Iv;

/// Supplies the current time in UTC seconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        // A clock set before 1970 reads as the epoch
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

impl<F> Clock for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn now_secs(&self) -> u64 {
        self()
    }
}

/// Supplies a fresh IV for every token.
pub trait IvSource: Send + Sync {
    fn next_iv(&self) -> Iv;
}

/// IVs from the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIvSource;

impl IvSource for RandomIvSource {
    fn next_iv(&self) -> Iv {
        Iv::generate()
    }
}

impl<F> IvSource for F
where
    F: Fn() -> Iv + Send + Sync,
{
    fn next_iv(&self) -> Iv {
        self()
    }
}
