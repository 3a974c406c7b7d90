//! The `RecordStore` seam (spec.md §6, named `KeyValueStore` there; this
//! crate uses `RecordStore` to avoid confusion with the module name).
//! The Engine is the store's only writer; stage executors never touch
//! it (Design Notes: "Shared repository-like state service"). Grounded
//! on the `core-database::repository` async-trait convention, adapted to
//! the single-record-id compare-and-swap shape spec.md §5 requires.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, VerificationError};
use crate::models::VerificationRequest;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<VerificationRequest>>;

    /// Commit a fully-formed next-state record. Implementations must
    /// enforce single-writer-per-id semantics; a concurrent conflicting
    /// write is reported as `Transient` rather than silently lost.
    async fn put(&self, request: VerificationRequest) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<Uuid, VerificationRequest>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, id: Uuid) -> Result<Option<VerificationRequest>> {
        Ok(self
            .records
            .read()
            .map_err(|_| VerificationError::fatal("record store lock poisoned"))?
            .get(&id)
            .cloned())
    }

    async fn put(&self, request: VerificationRequest) -> Result<()> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| VerificationError::fatal("record store lock poisoned"))?;
        guard.insert(request.id, request);
        Ok(())
    }
}
