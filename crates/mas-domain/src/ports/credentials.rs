//! Credential bundle contract
//!
//! The protocol library owns the shape of its long-lived identity record;
//! this crate only needs to round-trip it through the codec and construct a
//! fresh one when a namespace has no stored state yet.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Caller-supplied credential bundle
///
/// Implemented by the protocol library's identity/key record. Binary fields
/// should use [`crate::types::Buffer`] so they survive the tagged JSON wire
/// form bit-for-bit.
///
/// # Example
///
/// ```ignore
/// use mas_domain::{Buffer, Credentials};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct DeviceCreds {
///     registration_id: u32,
///     noise_key: Buffer,
/// }
///
/// impl Credentials for DeviceCreds {
///     fn init() -> Self {
///         Self { registration_id: generate_registration_id(), noise_key: generate_key() }
///     }
/// }
/// ```
pub trait Credentials: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Construct a freshly generated bundle for a namespace with no stored
    /// state
    fn init() -> Self;
}
