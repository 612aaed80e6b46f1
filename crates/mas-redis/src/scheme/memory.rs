//! In-memory key scheme for testing
//!
//! Stores everything in process-local HashMaps. Useful for exercising the
//! auth-store engine without a running server.

use async_trait::async_trait;
use mas_domain::error::Result;
use mas_domain::ports::KeyScheme;
use mas_domain::types::RecordWrite;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// HashMap-backed scheme with the same observable semantics as the real
/// layouts
#[derive(Debug, Default)]
pub struct InMemoryScheme {
    bundle: Mutex<Option<String>>,
    records: Mutex<HashMap<(String, String), String>>,
}

impl InMemoryScheme {
    /// Create an empty in-memory scheme
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stored bundle, e.g. with a corrupted payload
    pub fn seed_bundle<S: Into<String>>(&self, payload: S) {
        *self.bundle.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.into());
    }
}

#[async_trait]
impl KeyScheme for InMemoryScheme {
    async fn read_bundle(&self) -> Result<Option<String>> {
        Ok(self
            .bundle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn write_bundle(&self, payload: &str) -> Result<()> {
        *self.bundle.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.to_string());
        Ok(())
    }

    async fn read_records(&self, category: &str, ids: &[String]) -> Result<Vec<Option<String>>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(ids
            .iter()
            .map(|id| {
                records
                    .get(&(category.to_string(), id.clone()))
                    .cloned()
            })
            .collect())
    }

    async fn write_records(&self, writes: &[RecordWrite]) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        for write in writes {
            let address = (write.category.clone(), write.id.clone());
            match &write.payload {
                Some(payload) => {
                    records.insert(address, payload.clone());
                }
                None => {
                    records.remove(&address);
                }
            }
        }
        Ok(())
    }

    fn scheme_name(&self) -> &str {
        "memory"
    }
}
