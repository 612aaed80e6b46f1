//! Binary-tagged JSON codec
//!
//! Serializes arbitrary nested structures containing binary values into the
//! text form the protocol client reads on the other side of the namespace:
//! every binary value becomes `{"type":"Buffer","data":"<base64>"}`.
//!
//! The representation is a stability contract. Stores written today must
//! remain readable by future releases, so the tagged form never changes; the
//! decoder additionally accepts the legacy array-of-bytes form
//! (`"data":[1,2,3]`) and canonicalizes it to base64.

use crate::error::{Error, Result};
use crate::types::BUFFER_TAG;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Encode a value tree into its text form
///
/// Tagged binary values are canonicalized to the base64 form before
/// stringification.
pub fn encode(value: &Value) -> Result<String> {
    let canonical = canonicalize(value.clone())?;
    Ok(serde_json::to_string(&canonical)?)
}

/// Decode a stored text payload back into a value tree
///
/// Malformed JSON and corrupted base64 inside a tagged binary value both
/// propagate as errors; a corrupted record is never silently replaced.
pub fn decode(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)?;
    canonicalize(value)
}

/// Encode a typed value, e.g. a credential bundle
pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    let tree = serde_json::to_value(value)?;
    let canonical = canonicalize(tree)?;
    Ok(serde_json::to_string(&canonical)?)
}

/// Decode a stored text payload into a typed value
pub fn from_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    let tree = decode(text)?;
    Ok(serde_json::from_value(tree)?)
}

/// Rewrite every tagged binary value in the tree to the base64 form
///
/// Idempotent: a tree that is already canonical passes through unchanged.
fn canonicalize(value: Value) -> Result<Value> {
    match value {
        Value::Object(map) => {
            if is_tagged_buffer(&map) {
                return canonicalize_buffer(map);
            }
            let mut rebuilt = Map::with_capacity(map.len());
            for (key, entry) in map {
                rebuilt.insert(key, canonicalize(entry)?);
            }
            Ok(Value::Object(rebuilt))
        }
        Value::Array(items) => {
            let rebuilt = items
                .into_iter()
                .map(canonicalize)
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(rebuilt))
        }
        other => Ok(other),
    }
}

fn is_tagged_buffer(map: &Map<String, Value>) -> bool {
    map.get("type").and_then(Value::as_str) == Some(BUFFER_TAG) && map.contains_key("data")
}

fn canonicalize_buffer(map: Map<String, Value>) -> Result<Value> {
    // is_tagged_buffer checked the key is present
    let data = map
        .get("data")
        .ok_or_else(|| Error::codec("tagged binary value lost its data field"))?;

    let encoded = match data {
        Value::String(text) => {
            BASE64.decode(text.as_bytes())?;
            text.clone()
        }
        Value::Array(items) => {
            let bytes = items
                .iter()
                .map(byte_from_value)
                .collect::<Result<Vec<u8>>>()?;
            BASE64.encode(&bytes)
        }
        other => {
            return Err(Error::codec(format!(
                "tagged binary value carries unsupported data form: {other}"
            )));
        }
    };

    let mut canonical = Map::with_capacity(2);
    canonical.insert("type".to_string(), Value::String(BUFFER_TAG.to_string()));
    canonical.insert("data".to_string(), Value::String(encoded));
    Ok(Value::Object(canonical))
}

fn byte_from_value(value: &Value) -> Result<u8> {
    value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| Error::codec(format!("binary array element out of byte range: {value}")))
}
