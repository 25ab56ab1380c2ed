//! The client-side state codec.
//!
//! [`ClientSideState`] persists a value on the client with these properties:
//!
//! - the state stays opaque: it is encrypted, so the client cannot read it
//! - tampering is detected with a MAC
//! - a timeout is enforced on restore (30 minutes by default)
//!
//! The construction follows RFC 6896 (Secure Cookie Sessions for HTTP).
//!
//! ## Restore pipeline
//!
//! 1. parse the five token fields
//! 2. pick the edition matching the token's tid
//! 3. verify the MAC in constant time
//! 4. check freshness against the (now authenticated) timestamp
//! 5. decrypt
//! 6. deserialize

use std::sync::Arc;

use client_state_core::{Edition, Editions, StatePacket};
use client_state_http::{Cookie, NewCookie};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StateConfig;
use crate::error::{Result, StateError};
use crate::serialization::{JsonSerializer, StateSerializer};
use crate::source::{Clock, IvSource, RandomIvSource, SystemClock};

/// A restored value together with its issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamped<T> {
    pub value: T,
    /// Issue time in UTC seconds.
    pub issued_at: u64,
}

/// Persists state on the client and restores it.
///
/// Immutable once built and safe to share between threads.
pub struct ClientSideState<S = JsonSerializer> {
    editions: Editions,
    config: StateConfig,
    clock: Arc<dyn Clock>,
    iv_source: Arc<dyn IvSource>,
    serializer: S,
}

impl ClientSideState<JsonSerializer> {
    /// JSON serialization, system clock, random IVs and default timeouts.
    pub fn new(editions: impl Into<Editions>) -> Self {
        Self::with_config(editions, StateConfig::default())
    }

    pub fn with_config(editions: impl Into<Editions>, config: StateConfig) -> Self {
        Self {
            editions: editions.into(),
            config,
            clock: Arc::new(SystemClock),
            iv_source: Arc::new(RandomIvSource),
            serializer: JsonSerializer,
        }
    }
}

impl<S: StateSerializer> ClientSideState<S> {
    /// Replace the clock.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the IV source.
    pub fn iv_source(mut self, iv_source: impl IvSource + 'static) -> Self {
        self.iv_source = Arc::new(iv_source);
        self
    }

    /// Replace the serializer.
    pub fn serializer<S2: StateSerializer>(self, serializer: S2) -> ClientSideState<S2> {
        ClientSideState {
            editions: self.editions,
            config: self.config,
            clock: self.clock,
            iv_source: self.iv_source,
            serializer,
        }
    }

    pub fn editions(&self) -> &Editions {
        &self.editions
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persist
    // ─────────────────────────────────────────────────────────────────────────

    /// Seal `value` into a cookie named `key`, scoped to `path`.
    pub fn persist<T: Serialize + ?Sized>(
        &self,
        key: &str,
        path: &str,
        value: &T,
    ) -> Result<NewCookie> {
        let token = self.protect(value)?;

        let mut cookie = NewCookie::new(key, token, path).with_http_only(self.config.http_only);
        if self.config.set_max_age {
            cookie = cookie.with_max_age(self.config.timeout.as_secs());
        }

        Ok(cookie)
    }

    /// Seal `value` into a bare token string.
    pub fn protect<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let clear = self.serializer.serialize(value)?;
        let edition = self.editions.current();

        let iv = self.iv_source.next_iv();
        let now = self.clock.now_secs();
        let packet = StatePacket::seal(edition, iv, now, &clear)?;
        let token = packet.encode();

        tracing::trace!(tid = %edition.tid(), len = token.len(), "sealed client state");

        Ok(token)
    }

    /// A cookie that clears state previously persisted under `key`.
    pub fn removal(&self, key: &str, path: &str) -> NewCookie {
        NewCookie::removal(key, path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Restore
    // ─────────────────────────────────────────────────────────────────────────

    /// Restore the value carried by `cookie`.
    pub fn restore_from<T: DeserializeOwned>(&self, cookie: &Cookie) -> Result<T> {
        self.restore_value(&cookie.value)
    }

    /// Restore the value carried by a bare token string.
    pub fn restore_value<T: DeserializeOwned>(&self, token: &str) -> Result<T> {
        Ok(self.restore_with_timestamp(token)?.value)
    }

    /// Restore a value along with the time it was issued.
    pub fn restore_with_timestamp<T: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<Timestamped<T>> {
        let packet = StatePacket::parse(token)?;
        let edition = self.editions.find(packet.tid)?;

        if !packet.verify(edition)? {
            return Err(StateError::Integrity);
        }

        self.check_freshness(packet.timestamp)?;

        let clear = self.open(&packet, edition)?;
        let value = self.serializer.deserialize(&clear)?;

        Ok(Timestamped {
            value,
            issued_at: packet.timestamp,
        })
    }

    /// Restore every valid value among `cookies`, most recent first.
    ///
    /// Cookies that fail any check are logged and skipped. Each distinct value
    /// is returned once, at the position of its most recent issue.
    pub fn restore_all<'a, T, I>(&self, cookies: I) -> Vec<T>
    where
        T: DeserializeOwned + PartialEq,
        I: IntoIterator<Item = &'a Cookie>,
    {
        let mut restored: Vec<Timestamped<T>> = Vec::new();

        for cookie in cookies {
            match self.restore_with_timestamp::<T>(&cookie.value) {
                Ok(state) => restored.push(state),
                Err(e) => {
                    tracing::warn!("Unable to restore client side state: {}", e);
                    tracing::debug!(cookie = %cookie.name, kind = ?e.kind(), "dropped client side state");
                }
            }
        }

        // Stable, so equal timestamps keep their input order
        restored.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));

        let mut values: Vec<T> = Vec::with_capacity(restored.len());
        for state in restored {
            if !values.contains(&state.value) {
                values.push(state.value);
            }
        }
        values
    }

    /// Like [`ClientSideState::restore_all`], limited to cookies whose name starts with `prefix`.
    pub fn restore_with_prefix<'a, T, I>(&self, cookies: I, prefix: &str) -> Vec<T>
    where
        T: DeserializeOwned + PartialEq,
        I: IntoIterator<Item = &'a Cookie>,
    {
        self.restore_all(
            cookies
                .into_iter()
                .filter(|c| c.name.starts_with(prefix)),
        )
    }

    fn check_freshness(&self, issued_at: u64) -> Result<()> {
        let now = self.clock.now_secs();
        let timeout = self.config.timeout.as_secs();
        let skew = self.config.max_clock_skew.as_secs();

        if issued_at <= now {
            if now - issued_at > timeout {
                return Err(StateError::Expired { issued_at, now });
            }
        } else if issued_at - now > skew {
            return Err(StateError::IssuedInFuture { issued_at, now });
        }

        Ok(())
    }

    fn open(&self, packet: &StatePacket, edition: &Edition) -> Result<Vec<u8>> {
        // Any decryption failure surfaces as Integrity via From<CoreError>
        Ok(packet.open(edition)?)
    }
}

impl<S> std::fmt::Debug for ClientSideState<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSideState")
            .field("editions", &self.editions)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
