//! Hashed key layout
//!
//! The whole namespace lives in one hash key `authState:<namespace>`; the
//! credential bundle and every keyed record are fields of it. Reads batch
//! into one HMGET, writes into one non-atomic pipeline of HSET/HDEL.

use crate::connection;
use async_trait::async_trait;
use mas_domain::error::{Error, Result};
use mas_domain::keys;
use mas_domain::ports::KeyScheme;
use mas_domain::types::RecordWrite;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

/// Hashed layout over one namespace
pub struct HashedScheme {
    conn: MultiplexedConnection,
    namespace: String,
    key: String,
}

impl HashedScheme {
    /// Create a hashed scheme for `namespace` on an open connection
    ///
    /// Also assigns the connection a diagnostic client name derived from the
    /// namespace, best-effort on a spawned task, so the session shows up
    /// legibly in the store's client list. Must be called inside a Tokio
    /// runtime.
    pub fn new<S: Into<String>>(conn: MultiplexedConnection, namespace: S) -> Self {
        let namespace = namespace.into();
        connection::assign_client_name(&conn, &namespace);
        let key = keys::hash_state_key(&namespace);
        Self {
            conn,
            namespace,
            key,
        }
    }

    /// Namespace this scheme is scoped to
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn connection(&self) -> MultiplexedConnection {
        self.conn.clone()
    }
}

#[async_trait]
impl KeyScheme for HashedScheme {
    async fn read_bundle(&self) -> Result<Option<String>> {
        let mut conn = self.connection();
        conn.hget::<_, _, Option<String>>(&self.key, keys::CREDENTIALS_FIELD)
            .await
            .map_err(|e| Error::store_with_source(format!("HGET failed for {}", self.key), e))
    }

    async fn write_bundle(&self, payload: &str) -> Result<()> {
        let mut conn = self.connection();
        conn.hset::<_, _, _, ()>(&self.key, keys::CREDENTIALS_FIELD, payload)
            .await
            .map_err(|e| Error::store_with_source(format!("HSET failed for {}", self.key), e))
    }

    async fn read_records(&self, category: &str, ids: &[String]) -> Result<Vec<Option<String>>> {
        // HMGET with zero fields is a protocol error
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.connection();
        let fields: Vec<String> = ids
            .iter()
            .map(|id| keys::record_field(category, id))
            .collect();
        redis::cmd("HMGET")
            .arg(&self.key)
            .arg(&fields)
            .query_async::<Vec<Option<String>>>(&mut conn)
            .await
            .map_err(|e| {
                Error::store_with_source(
                    format!("HMGET failed for {} {category} fields", ids.len()),
                    e,
                )
            })
    }

    async fn write_records(&self, writes: &[RecordWrite]) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection();
        let mut pipe = redis::pipe();
        for write in writes {
            let field = keys::record_field(&write.category, &write.id);
            match &write.payload {
                Some(payload) => pipe.hset(&self.key, &field, payload).ignore(),
                None => pipe.hdel(&self.key, &field).ignore(),
            };
        }
        pipe.query_async::<()>(&mut conn).await.map_err(|e| {
            Error::store_with_source(format!("pipelined write of {} fields failed", writes.len()), e)
        })
    }

    fn scheme_name(&self) -> &str {
        "hashed"
    }
}

impl std::fmt::Debug for HashedScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashedScheme")
            .field("namespace", &self.namespace)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
