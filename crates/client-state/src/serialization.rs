//! Pluggable value serialization.
//!
//! The codec only ever sees bytes; a [`StateSerializer`] turns values into
//! those bytes and back.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StateError};

/// Converts state values to bytes and back.
pub trait StateSerializer: Send + Sync {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// JSON via serde_json. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl StateSerializer for JsonSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| StateError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| StateError::Deserialization(e.to_string()))
    }
}

/// CBOR via ciborium. More compact than JSON for binary-heavy state.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborSerializer;

impl StateSerializer for CborSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StateError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        ciborium::from_reader(bytes).map_err(|e| StateError::Deserialization(e.to_string()))
    }
}
