//! Proptest generators for property-based testing.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;

use client_state::{
    CipherTransform, ClientSideState, Edition, MacAlgorithm, SecretKey, StateSerializer,
    StaticKeySource, Tid,
};

use crate::fixtures::FlowState;

/// Generate a state string, including non-ASCII and separator characters.
pub fn state_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 |=;#/_-]{0,64}".prop_map(String::from),
        any::<String>(),
    ]
}

/// Generate a map of strings.
pub fn string_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z_]{1,12}", state_string(), 0..8)
}

/// Generate a credential flow record.
pub fn flow_state() -> impl Strategy<Value = FlowState> {
    ("[a-z]{1,16}", "[0-9a-f]{8,32}", "/[a-z/#]{0,24}").prop_map(|(provider, key, url)| {
        FlowState {
            provider_id: provider,
            key,
            return_url: url,
        }
    })
}

/// Generate an issue timestamp in UTC seconds.
pub fn timestamp() -> impl Strategy<Value = u64> {
    0u64..=4_102_444_800 // up to 2100-01-01
}

/// Generate a MAC algorithm.
pub fn mac_algorithm() -> impl Strategy<Value = MacAlgorithm> {
    prop_oneof![
        Just(MacAlgorithm::HmacSha256),
        Just(MacAlgorithm::HmacSha384),
        Just(MacAlgorithm::HmacSha512),
    ]
}

/// Generate a valid AES key.
pub fn encryption_key() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![Just(16usize), Just(24usize), Just(32usize)]
        .prop_flat_map(|len| prop::collection::vec(any::<u8>(), len))
}

/// One of the value shapes the codec must round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Text(String),
    Map(BTreeMap<String, String>),
    Record(FlowState),
}

impl StateValue {
    /// Persist through `state` and restore as the same shape.
    pub fn roundtrip<S: StateSerializer>(
        &self,
        state: &ClientSideState<S>,
    ) -> client_state::Result<StateValue> {
        match self {
            StateValue::Text(v) => {
                let token = state.protect(v)?;
                Ok(StateValue::Text(state.restore_value(&token)?))
            }
            StateValue::Map(v) => {
                let token = state.protect(v)?;
                Ok(StateValue::Map(state.restore_value(&token)?))
            }
            StateValue::Record(v) => {
                let token = state.protect(v)?;
                Ok(StateValue::Record(state.restore_value(&token)?))
            }
        }
    }

    /// Seal with `state` without restoring.
    pub fn protect<S: StateSerializer>(
        &self,
        state: &ClientSideState<S>,
    ) -> client_state::Result<String> {
        match self {
            StateValue::Text(v) => state.protect(v),
            StateValue::Map(v) => state.protect(v),
            StateValue::Record(v) => state.protect(v),
        }
    }
}

impl Arbitrary for StateValue {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            state_string().prop_map(StateValue::Text),
            string_map().prop_map(StateValue::Map),
            flow_state().prop_map(StateValue::Record),
        ]
        .boxed()
    }
}

/// Parameters for generating an edition.
#[derive(Debug, Clone)]
pub struct EditionParams {
    pub tid: u64,
    pub mac: MacAlgorithm,
    pub authentication_key: Vec<u8>,
    pub encryption_key: Vec<u8>,
}

impl EditionParams {
    pub fn to_edition(&self) -> Edition {
        Edition::new(
            Tid::new(self.tid),
            CipherTransform::AesCbcPkcs7,
            self.mac,
            Arc::new(StaticKeySource::new(
                SecretKey::from_bytes(self.authentication_key.clone()),
                SecretKey::from_bytes(self.encryption_key.clone()),
            )),
        )
        .expect("generated keys are valid")
    }
}

impl Arbitrary for EditionParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<u64>(),
            mac_algorithm(),
            prop::collection::vec(any::<u8>(), 1..=64),
            encryption_key(),
        )
            .prop_map(|(tid, mac, auth, enc)| EditionParams {
                tid,
                mac,
                authentication_key: auth,
                encryption_key: enc,
            })
            .boxed()
    }
}
