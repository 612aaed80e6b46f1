//! Key and field naming
//!
//! The naming scheme is an interoperability contract: a protocol client on
//! the other side of the namespace reads the same keys, so every helper here
//! must stay byte-exact across releases.
//!
//! | Layout | Credential key/field | Record key/field |
//! |---|---|---|
//! | Flat | `<namespace>:creds` | `<namespace>:<category>-<id>` |
//! | Hashed | key `authState:<namespace>`, field `creds` | field `<category>-<id>` |

/// Namespace used when the caller does not pick one
pub const DEFAULT_NAMESPACE: &str = "DB1";

/// Field name holding the credential bundle in both layouts
pub const CREDENTIALS_FIELD: &str = "creds";

/// Fixed segment prefixing the hash key in the hashed layout
pub const HASH_KEY_PREFIX: &str = "authState";

/// Key of the credential bundle in the flat layout
#[inline]
pub fn flat_credentials_key(namespace: &str) -> String {
    format!("{namespace}:{CREDENTIALS_FIELD}")
}

/// Key of one keyed record in the flat layout
///
/// The category is embedded in the key, so identifiers from different
/// categories can never collide.
#[inline]
pub fn flat_record_key(namespace: &str, category: &str, id: &str) -> String {
    format!("{namespace}:{category}-{id}")
}

/// Key of the per-namespace hash in the hashed layout
#[inline]
pub fn hash_state_key(namespace: &str) -> String {
    format!("{HASH_KEY_PREFIX}:{namespace}")
}

/// Field name of one keyed record inside the per-namespace hash
#[inline]
pub fn record_field(category: &str, id: &str) -> String {
    format!("{category}-{id}")
}

/// Scan pattern matching every flat-layout key of one namespace
#[inline]
pub fn flat_namespace_pattern(namespace: &str) -> String {
    format!("{namespace}:*")
}
