//! Connection establishment
//!
//! Opens a multiplexed async connection and verifies it with PING before
//! handing it out. The connection handle is cheap to clone; the caller owns
//! its lifecycle, nothing in this crate ever closes it.

use crate::config::RedisConfig;
use mas_domain::error::{Error, Result};
use redis::Client;
use redis::aio::MultiplexedConnection;

/// Open and verify a connection described by `config`
///
/// # Errors
/// Returns a connection error when the client cannot be created, the server
/// is unreachable, or the PING handshake fails.
pub async fn connect(config: &RedisConfig) -> Result<MultiplexedConnection> {
    let address = config.address();
    tracing::info!("[AUTH] connecting to redis at {address}");

    let client = Client::open(config.connection_url().as_str())
        .map_err(|e| Error::connection_with_source("failed to create redis client", e))?;

    let mut conn = client
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| {
            Error::connection_with_source(format!("failed to connect to redis at {address}"), e)
        })?;

    let pong: String = redis::cmd("PING")
        .query_async(&mut conn)
        .await
        .map_err(|e| Error::connection_with_source("redis ping failed", e))?;
    if pong != "PONG" {
        return Err(Error::connection("redis ping did not return pong"));
    }

    tracing::info!("[AUTH] redis connection established");
    Ok(conn)
}

/// Best-effort diagnostic name for the connection, visible in CLIENT LIST
///
/// Fire-and-forget: runs on a spawned task and only logs on failure, the
/// caller never sees an error from it.
pub fn assign_client_name(conn: &MultiplexedConnection, namespace: &str) {
    let name = client_name(namespace);
    let mut conn = conn.clone();
    tokio::spawn(async move {
        if let Err(e) = redis::cmd("CLIENT")
            .arg("SETNAME")
            .arg(&name)
            .query_async::<()>(&mut conn)
            .await
        {
            tracing::debug!("[AUTH] failed to set client name {name}: {e}");
        }
    });
}

// CLIENT SETNAME rejects whitespace
fn client_name(namespace: &str) -> String {
    let sanitized: String = namespace.chars().filter(|c| !c.is_whitespace()).collect();
    format!("auth-{sanitized}")
}
