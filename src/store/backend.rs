use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StoreError;

/// Durable substrate behind the collection store: an opaque blob per key.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn set(&self, key: &str, blob: Vec<u8>) -> Result<(), StoreError>;
}

/// Process-local backend, used by tests and throwaway runs.
#[derive(Default)]
pub struct MemoryBackend {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, blob: Vec<u8>) -> Result<(), StoreError> {
        self.blobs.write().await.insert(key.to_string(), blob);
        Ok(())
    }
}
