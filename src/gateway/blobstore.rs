//! The `BlobStore` seam (spec.md §6): out of scope to implement for
//! production, but the crate defines the trait and an in-memory
//! reference implementation for tests — grounded on the
//! `DocumentAnalyzer`-style async trait convention used throughout the
//! wider example corpus (`core-regtech::document_analysis`).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, VerificationError};

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn download(&self, path: &str) -> Result<Vec<u8>>;
}

/// Reference implementation backing the integration scenarios. Never
/// intended for production use.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: impl Into<String>, bytes: Vec<u8>) {
        self.blobs.write().expect("blob store lock poisoned").insert(path.into(), bytes);
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .expect("blob store lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| VerificationError::input(format!("blob not found: {path}")))
    }
}
