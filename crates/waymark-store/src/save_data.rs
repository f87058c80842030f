//! Injected host key-value save store.

use async_lock::RwLock;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use waymark_core::SyncError;

/// Opaque byte-oriented key-value store supplied by the host.
///
/// The host's world save exposes exactly this surface: fetch the bytes under
/// a key (absent keys are `None`, not an error) and atomically overwrite the
/// bytes under a key.
#[async_trait]
pub trait SaveData: Send + Sync {
    /// Fetch the bytes stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SyncError>;

    /// Atomically replace the bytes stored under `key`.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), SyncError>;
}

/// In-memory [`SaveData`] used by tests and embedding harnesses.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveData {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemorySaveData {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key, bypassing the adapter. Test setup convenience.
    pub async fn seed(&self, key: &str, bytes: Vec<u8>) {
        self.entries.write().await.insert(key.to_string(), bytes);
    }

    /// Whether a key currently holds data.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl SaveData for MemorySaveData {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SyncError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), SyncError> {
        self.entries.write().await.insert(key.to_string(), bytes);
        Ok(())
    }
}
