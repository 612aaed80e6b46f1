//! Redis provider for messaging auth-state persistence
//!
//! Persists a protocol client's credential bundle and keyed session records
//! into Redis so a session can resume without re-pairing. Two physical
//! layouts cover the same logical state:
//!
//! - **Flat**: one top-level key per record under a namespace prefix
//!   (`<ns>:creds`, `<ns>:<category>-<id>`)
//! - **Hashed**: one hash key per namespace (`authState:<ns>`) holding every
//!   record as a field
//!
//! Both are implementations of the [`mas_domain::KeyScheme`] strategy behind
//! one generic [`store::AuthStore`] engine.
//!
//! ## Example
//!
//! ```ignore
//! use mas_redis::{RedisAuthState, RedisConfig};
//!
//! let config = RedisConfig::default();
//! let auth = RedisAuthState::<DeviceCreds>::open_hashed(&config, "device-7").await?;
//! auth.store().save_creds().await?;
//! let conn = auth.connection(); // caller owns lifecycle
//! ```

pub mod config;
pub mod connection;
pub mod maintenance;
pub mod scheme;
pub mod store;

pub use config::RedisConfig;
pub use scheme::{FlatScheme, HashedScheme, InMemoryScheme};
pub use store::{AuthStore, RedisAuthState};
