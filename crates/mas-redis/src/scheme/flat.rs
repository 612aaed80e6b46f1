//! Flat key layout
//!
//! Every record is its own top-level key: the credential bundle lives at
//! `<namespace>:creds`, keyed records at `<namespace>:<category>-<id>`.
//! Reads batch into one MGET, writes into one non-atomic pipeline.

use async_trait::async_trait;
use mas_domain::error::{Error, Result};
use mas_domain::keys;
use mas_domain::ports::KeyScheme;
use mas_domain::types::RecordWrite;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

/// Flat layout over one namespace
pub struct FlatScheme {
    conn: MultiplexedConnection,
    namespace: String,
}

impl FlatScheme {
    /// Create a flat scheme for `namespace` on an open connection
    pub fn new<S: Into<String>>(conn: MultiplexedConnection, namespace: S) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
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
impl KeyScheme for FlatScheme {
    async fn read_bundle(&self) -> Result<Option<String>> {
        let mut conn = self.connection();
        let key = keys::flat_credentials_key(&self.namespace);
        conn.get::<_, Option<String>>(&key)
            .await
            .map_err(|e| Error::store_with_source(format!("GET failed for {key}"), e))
    }

    async fn write_bundle(&self, payload: &str) -> Result<()> {
        let mut conn = self.connection();
        let key = keys::flat_credentials_key(&self.namespace);
        conn.set::<_, _, ()>(&key, payload)
            .await
            .map_err(|e| Error::store_with_source(format!("SET failed for {key}"), e))
    }

    async fn read_records(&self, category: &str, ids: &[String]) -> Result<Vec<Option<String>>> {
        // MGET with zero keys is a protocol error
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.connection();
        let record_keys: Vec<String> = ids
            .iter()
            .map(|id| keys::flat_record_key(&self.namespace, category, id))
            .collect();
        redis::cmd("MGET")
            .arg(&record_keys)
            .query_async::<Vec<Option<String>>>(&mut conn)
            .await
            .map_err(|e| {
                Error::store_with_source(
                    format!("MGET failed for {} {category} records", ids.len()),
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
            let key = keys::flat_record_key(&self.namespace, &write.category, &write.id);
            match &write.payload {
                Some(payload) => pipe.set(&key, payload).ignore(),
                None => pipe.del(&key).ignore(),
            };
        }
        pipe.query_async::<()>(&mut conn).await.map_err(|e| {
            Error::store_with_source(format!("pipelined write of {} records failed", writes.len()), e)
        })
    }

    fn scheme_name(&self) -> &str {
        "flat"
    }
}

impl std::fmt::Debug for FlatScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatScheme")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}
