//! In-memory secret store used by the collection unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::secrets::{Result, SecretMetadata, SecretStore, SecretsError};

#[derive(Default)]
pub(crate) struct FakeStore {
    listings: HashMap<String, serde_json::Value>,
    failing_listings: HashSet<String>,
    metadata: HashMap<String, Option<SecretMetadata>>,
    failing_metadata: HashSet<String>,
    metadata_reads: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_listing(mut self, path: &str, keys: serde_json::Value) -> Self {
        self.listings.insert(path.to_string(), keys);
        self
    }

    pub(crate) fn with_failing_listing(mut self, path: &str) -> Self {
        self.failing_listings.insert(path.to_string());
        self
    }

    pub(crate) fn with_metadata(mut self, path: &str, metadata: Option<SecretMetadata>) -> Self {
        self.metadata.insert(path.to_string(), metadata);
        self
    }

    pub(crate) fn with_failing_metadata(mut self, path: &str) -> Self {
        self.failing_metadata.insert(path.to_string());
        self
    }

    pub(crate) fn metadata_reads(&self) -> usize {
        self.metadata_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for FakeStore {
    async fn list_keys(&self, path: &str) -> Result<Option<serde_json::Value>> {
        if self.failing_listings.contains(path) {
            return Err(SecretsError::connection_failed(format!("listing '{}' refused", path)));
        }
        Ok(self.listings.get(path).cloned())
    }

    async fn read_metadata(&self, path: &str) -> Result<Option<SecretMetadata>> {
        self.metadata_reads.fetch_add(1, Ordering::SeqCst);
        if self.failing_metadata.contains(path) {
            return Err(SecretsError::backend_error(format!("metadata '{}' unavailable", path)));
        }
        self.metadata.get(path).cloned().ok_or_else(|| SecretsError::not_found(path))
    }
}
