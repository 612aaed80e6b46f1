//! Key scheme implementations
//!
//! Two physical layouts for the same logical namespace, plus an in-memory
//! test double:
//!
//! - [`FlatScheme`] - one top-level key per record under a namespace prefix
//! - [`HashedScheme`] - one hash key per namespace, records as fields
//! - [`InMemoryScheme`] - HashMap-backed, for tests that need no server

pub mod flat;
pub mod hashed;
pub mod memory;

pub use flat::FlatScheme;
pub use hashed::HashedScheme;
pub use memory::InMemoryScheme;
