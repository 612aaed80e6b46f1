//! Auth-store engine
//!
//! One generic persistence engine over the [`KeyScheme`] strategy. The
//! engine owns codec application and the absent-record omission semantics;
//! the scheme owns key naming and store I/O.
//!
//! Concurrency model: all operations are plain awaited I/O against one
//! connection. Nothing here serializes concurrent callers; commands within
//! one pipelined batch apply in submission order, but batches from
//! concurrent callers may interleave. Callers wanting stronger consistency
//! enforce a single-writer discipline themselves.

use crate::config::RedisConfig;
use crate::connection;
use crate::scheme::{FlatScheme, HashedScheme};
use mas_domain::codec;
use mas_domain::error::Result;
use mas_domain::ports::{Credentials, KeyScheme};
use mas_domain::types::{RecordChanges, RecordWrite};
use redis::aio::MultiplexedConnection;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Generic auth-state persistence engine
///
/// Holds the loaded credential bundle in memory and persists it, plus keyed
/// session records, through whichever [`KeyScheme`] it was opened with.
/// The bundle is only written on an explicit [`save_creds`](Self::save_creds);
/// there is no write-through.
pub struct AuthStore<C: Credentials> {
    creds: RwLock<C>,
    scheme: Arc<dyn KeyScheme>,
}

impl<C: Credentials> AuthStore<C> {
    /// Load the credential bundle through `scheme`, falling back to a fresh
    /// [`Credentials::init`] bundle when none is stored
    ///
    /// # Errors
    /// A stored bundle that fails to decode propagates as a serialization
    /// error; it is never silently replaced with a fresh bundle.
    pub async fn open(scheme: Arc<dyn KeyScheme>) -> Result<Self> {
        let creds = match scheme.read_bundle().await? {
            Some(payload) => {
                let creds = codec::from_str(&payload)?;
                tracing::info!(
                    "[AUTH] loaded credential bundle via {} scheme",
                    scheme.scheme_name()
                );
                creds
            }
            None => {
                tracing::info!(
                    "[AUTH] no stored credential bundle via {} scheme, initializing fresh",
                    scheme.scheme_name()
                );
                C::init()
            }
        };
        Ok(Self {
            creds: RwLock::new(creds),
            scheme,
        })
    }

    /// Read access to the in-memory bundle
    pub fn with_creds<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let creds = self.creds.read().unwrap_or_else(PoisonError::into_inner);
        f(&creds)
    }

    /// Mutate the in-memory bundle; persisted only on the next
    /// [`save_creds`](Self::save_creds)
    pub fn update_creds<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut creds = self.creds.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut creds)
    }

    /// Clone the current bundle out
    pub fn snapshot(&self) -> C
    where
        C: Clone,
    {
        self.with_creds(C::clone)
    }

    /// Persist the current credential bundle, overwriting any stored value
    pub async fn save_creds(&self) -> Result<()> {
        let payload = {
            let creds = self.creds.read().unwrap_or_else(PoisonError::into_inner);
            codec::to_string(&*creds)?
        };
        self.scheme.write_bundle(&payload).await
    }

    /// Fetch records of one category by identifier
    ///
    /// One bulk round trip; identifiers with no stored record are omitted
    /// from the result map rather than mapped to null. An empty `ids` slice
    /// returns an empty map without touching the store.
    pub async fn get_keys(&self, category: &str, ids: &[String]) -> Result<HashMap<String, Value>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let raw = self.scheme.read_records(category, ids).await?;
        let mut found = HashMap::with_capacity(raw.len());
        for (id, payload) in ids.iter().zip(raw) {
            if let Some(payload) = payload {
                found.insert(id.clone(), codec::decode(&payload)?);
            }
        }
        Ok(found)
    }

    /// Apply one batch of record writes and deletions
    ///
    /// The whole batch goes out as a single pipelined dispatch. The store
    /// gives no cross-record atomicity: a mid-batch failure can leave the
    /// batch partially applied.
    pub async fn set_keys(&self, changes: &RecordChanges) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut writes = Vec::with_capacity(changes.len());
        for (category, id, value) in changes.entries() {
            let payload = match value {
                Some(value) => Some(codec::encode(value)?),
                None => None,
            };
            writes.push(RecordWrite {
                category: category.to_string(),
                id: id.to_string(),
                payload,
            });
        }
        self.scheme.write_records(&writes).await
    }

    /// Identifier of the layout this store was opened with
    pub fn scheme_name(&self) -> &str {
        self.scheme.scheme_name()
    }
}

impl<C: Credentials> std::fmt::Debug for AuthStore<C> {
    // Credential material stays out of Debug output
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

/// An opened Redis-backed auth state
///
/// Bundles the engine with the underlying connection handle. The caller owns
/// the connection lifecycle; this crate opens it and never closes it.
pub struct RedisAuthState<C: Credentials> {
    store: AuthStore<C>,
    connection: MultiplexedConnection,
}

impl<C: Credentials> RedisAuthState<C> {
    /// Open the flat layout for `namespace`
    ///
    /// Connects, verifies the connection, and loads (or initializes) the
    /// credential bundle before returning. Connection failure is fatal to
    /// the open.
    pub async fn open_flat(config: &RedisConfig, namespace: &str) -> Result<Self> {
        let conn = connection::connect(config).await?;
        let scheme: Arc<dyn KeyScheme> = Arc::new(FlatScheme::new(conn.clone(), namespace));
        Self::open_with(scheme, conn).await
    }

    /// Open the hashed layout for `namespace`
    ///
    /// Same contract as [`open_flat`](Self::open_flat); additionally assigns
    /// the connection a diagnostic client name, best-effort.
    pub async fn open_hashed(config: &RedisConfig, namespace: &str) -> Result<Self> {
        let conn = connection::connect(config).await?;
        let scheme: Arc<dyn KeyScheme> = Arc::new(HashedScheme::new(conn.clone(), namespace));
        Self::open_with(scheme, conn).await
    }

    async fn open_with(
        scheme: Arc<dyn KeyScheme>,
        connection: MultiplexedConnection,
    ) -> Result<Self> {
        let store = AuthStore::open(scheme).await?;
        Ok(Self { store, connection })
    }

    /// The persistence engine
    pub fn store(&self) -> &AuthStore<C> {
        &self.store
    }

    /// Clone of the underlying connection handle, for caller-side lifecycle
    /// management and the cleanup utilities in [`crate::maintenance`]
    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}
