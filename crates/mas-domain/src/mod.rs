//! Domain layer for messaging auth-state persistence
//!
//! Core types and boundary contracts shared by every storage backend:
//! the error taxonomy, the byte-exact key/field naming scheme, the
//! binary-tagged JSON codec, and the port traits implemented by
//! provider crates.
//!
//! This crate is storage-agnostic on purpose. Anything that talks to a
//! concrete store lives behind the [`ports::KeyScheme`] trait.

pub mod codec;
pub mod error;
pub mod keys;
pub mod ports;
pub mod types;

// Re-export the types callers touch on every interaction
pub use error::{Error, Result};
pub use ports::{Credentials, KeyScheme};
pub use types::{Buffer, RecordChanges, RecordWrite};
