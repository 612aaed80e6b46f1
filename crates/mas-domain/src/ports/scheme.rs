//! Key scheme port
//!
//! Defines the contract for a physical key layout. The flat and hashed
//! layouts persist the same logical state; only the mapping onto store keys
//! and fields differs, so everything above this trait is layout-agnostic.

use crate::error::Result;
use crate::types::RecordWrite;
use async_trait::async_trait;

/// Physical layout strategy for one namespace
///
/// Payloads crossing this boundary are already encoded text; the scheme is
/// responsible only for key/field naming and store I/O. Bulk operations issue
/// a single round trip (or one pipelined dispatch) and must short-circuit on
/// empty input instead of sending an empty command.
#[async_trait]
pub trait KeyScheme: Send + Sync + std::fmt::Debug {
    /// Read the encoded credential bundle, `None` when never written
    async fn read_bundle(&self) -> Result<Option<String>>;

    /// Write the encoded credential bundle, overwriting any existing value
    async fn write_bundle(&self, payload: &str) -> Result<()>;

    /// Read records of one category, positionally aligned with `ids`
    ///
    /// Absent records come back as `None` in their position; one bulk round
    /// trip for the whole batch.
    async fn read_records(&self, category: &str, ids: &[String]) -> Result<Vec<Option<String>>>;

    /// Apply one batch of writes and deletions as a single pipelined dispatch
    ///
    /// The store applies commands in submission order but gives no
    /// all-or-nothing guarantee across them; a mid-batch failure can leave
    /// the batch partially applied.
    async fn write_records(&self, writes: &[RecordWrite]) -> Result<()>;

    /// Identifier of this layout (e.g. "flat", "hashed")
    fn scheme_name(&self) -> &str;
}
