//! Bulk cleanup utilities
//!
//! Two deletion helpers matching the two layouts. Their failure policies
//! differ on purpose: [`delete_by_pattern`] is an administrative sweep over
//! an unbounded keyspace, so any command failure propagates and stops
//! progress; [`delete_hash`] removes a single session hash and is
//! best-effort, logging and swallowing failures.

use mas_domain::error::{Error, Result};
use mas_domain::keys;
use redis::aio::MultiplexedConnection;

/// Keys examined per SCAN iteration
const SCAN_BATCH_SIZE: usize = 500;

/// Remove every key matching `pattern`, e.g. `"my-namespace:*"`
///
/// Walks the keyspace with a cursor-based SCAN in bounded batches rather
/// than a single blocking listing, and removes each non-empty batch with a
/// non-blocking UNLINK. Terminates once the cursor returns to 0. Idempotent:
/// a pattern matching nothing completes without error.
///
/// # Errors
/// Any SCAN or UNLINK failure propagates immediately; keys already unlinked
/// stay deleted.
pub async fn delete_by_pattern(conn: &mut MultiplexedConnection, pattern: &str) -> Result<()> {
    let mut cursor: u64 = 0;
    let mut removed: usize = 0;
    loop {
        let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_BATCH_SIZE)
            .query_async(&mut *conn)
            .await
            .map_err(|e| Error::store_with_source(format!("SCAN failed for {pattern}"), e))?;

        if !batch.is_empty() {
            removed += batch.len();
            redis::cmd("UNLINK")
                .arg(&batch)
                .query_async::<()>(&mut *conn)
                .await
                .map_err(|e| {
                    Error::store_with_source(format!("UNLINK failed for {} keys", batch.len()), e)
                })?;
        }

        cursor = next;
        if cursor == 0 {
            break;
        }
    }
    tracing::info!("[CLEANUP] removed {removed} keys matching {pattern}");
    Ok(())
}

/// Remove the hashed-layout state of `namespace`
///
/// Deletes the single key `authState:<namespace>`. Best-effort: a command
/// failure is logged at warn level and swallowed, the call always returns
/// normally. Deleting a namespace that was never written is a no-op.
pub async fn delete_hash(conn: &mut MultiplexedConnection, namespace: &str) {
    let key = keys::hash_state_key(namespace);
    match redis::cmd("DEL")
        .arg(&key)
        .query_async::<()>(&mut *conn)
        .await
    {
        Ok(()) => tracing::info!("[CLEANUP] removed session hash {key}"),
        Err(e) => tracing::warn!("[CLEANUP] failed to delete session hash {key}: {e}"),
    }
}
