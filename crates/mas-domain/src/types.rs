//! Core value types
//!
//! [`Buffer`] carries binary credential material through the JSON wire form,
//! [`RecordChanges`] collects one batch of keyed-record mutations, and
//! [`RecordWrite`] is the flattened, already-encoded form handed to a
//! key scheme.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Tag marking a binary value in the JSON wire form
pub const BUFFER_TAG: &str = "Buffer";

/// Well-known keyed-record categories used by the protocol client
pub mod category {
    /// One-time prekeys, addressed by numeric id
    pub const PRE_KEY: &str = "pre-key";
    /// Established pairwise sessions
    pub const SESSION: &str = "session";
    /// Group sender keys
    pub const SENDER_KEY: &str = "sender-key";
    /// Dispatch bookkeeping for sender keys
    pub const SENDER_KEY_MEMORY: &str = "sender-key-memory";
    /// App-state sync key material
    pub const APP_STATE_SYNC_KEY: &str = "app-state-sync-key";
    /// App-state sync version markers
    pub const APP_STATE_SYNC_VERSION: &str = "app-state-sync-version";
}

/// Binary value with a text-safe JSON representation
///
/// Serializes to the tagged wire form `{"type":"Buffer","data":"<base64>"}`
/// and deserializes from either the base64 form or the raw byte-array form
/// (`{"type":"Buffer","data":[1,2,3]}`). Both forms appear in stores written
/// by older protocol clients; only the base64 form is ever written back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buffer(pub Vec<u8>);

impl Buffer {
    /// Wrap raw bytes
    pub fn new<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self(bytes.into())
    }

    /// Consume the wrapper and return the raw bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::ops::Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for Buffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct(BUFFER_TAG, 2)?;
        state.serialize_field("type", BUFFER_TAG)?;
        state.serialize_field("data", &BASE64.encode(&self.0))?;
        state.end()
    }
}

/// Wire-side shape accepted when reading a tagged binary value
#[derive(Deserialize)]
struct TaggedBuffer {
    #[serde(rename = "type")]
    tag: String,
    data: TaggedData,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaggedData {
    Base64(String),
    Raw(Vec<u8>),
}

impl<'de> Deserialize<'de> for Buffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = TaggedBuffer::deserialize(deserializer)?;
        if tagged.tag != BUFFER_TAG {
            return Err(D::Error::custom(format!(
                "expected tag {BUFFER_TAG:?}, got {:?}",
                tagged.tag
            )));
        }
        let bytes = match tagged.data {
            TaggedData::Base64(text) => BASE64.decode(text.as_bytes()).map_err(D::Error::custom)?,
            TaggedData::Raw(bytes) => bytes,
        };
        Ok(Self(bytes))
    }
}

/// One batch of keyed-record mutations
///
/// Maps category to identifier to the new value; `None` marks the record for
/// deletion rather than storing an empty value.
///
/// # Example
///
/// ```ignore
/// use mas_domain::types::{category, RecordChanges};
///
/// let mut changes = RecordChanges::new();
/// changes.set(category::PRE_KEY, "1", serde_json::json!({"public": "..."}));
/// changes.remove(category::SESSION, "old-device");
/// store.set_keys(&changes).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordChanges {
    changes: HashMap<String, HashMap<String, Option<Value>>>,
}

impl RecordChanges {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a write of `value` to `(category, id)`
    pub fn set<C: Into<String>, I: Into<String>>(
        &mut self,
        category: C,
        id: I,
        value: Value,
    ) -> &mut Self {
        self.changes
            .entry(category.into())
            .or_default()
            .insert(id.into(), Some(value));
        self
    }

    /// Stage a deletion of `(category, id)`
    pub fn remove<C: Into<String>, I: Into<String>>(&mut self, category: C, id: I) -> &mut Self {
        self.changes
            .entry(category.into())
            .or_default()
            .insert(id.into(), None);
        self
    }

    /// Total number of staged writes and deletions
    pub fn len(&self) -> usize {
        self.changes.values().map(HashMap::len).sum()
    }

    /// True when nothing is staged
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate staged entries as `(category, id, value)` triples
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, Option<&Value>)> {
        self.changes.iter().flat_map(|(category, records)| {
            records
                .iter()
                .map(move |(id, value)| (category.as_str(), id.as_str(), value.as_ref()))
        })
    }
}

impl From<HashMap<String, HashMap<String, Option<Value>>>> for RecordChanges {
    fn from(changes: HashMap<String, HashMap<String, Option<Value>>>) -> Self {
        Self { changes }
    }
}

/// One already-encoded record mutation, addressed logically
///
/// The key scheme maps `(category, id)` onto its physical key or field name;
/// `payload == None` is a deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWrite {
    /// Record category, e.g. [`category::PRE_KEY`]
    pub category: String,
    /// Identifier within the category
    pub id: String,
    /// Encoded record text, or `None` to delete
    pub payload: Option<String>,
}
