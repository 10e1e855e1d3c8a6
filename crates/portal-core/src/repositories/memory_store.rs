//! In-memory backing store with an optional byte quota

use parking_lot::Mutex;
use std::collections::HashMap;

use super::BackingStore;
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryBackingStore {
    map: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
}

impl MemoryBackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes that would push the total of key and value bytes
    /// over `quota_bytes`, like a browser's local storage quota.
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self { map: Mutex::new(HashMap::new()), quota_bytes: Some(quota_bytes) }
    }

    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.lock().is_empty()
    }

    pub fn used_bytes(&self) -> u64 {
        self.map
            .lock()
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }
}

impl BackingStore for MemoryBackingStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.map.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.map.lock();
        if let Some(limit) = self.quota_bytes {
            let others: u64 = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| (k.len() + v.len()) as u64)
                .sum();
            let needed = others + (key.len() + value.len()) as u64;
            if needed > limit {
                return Err(StorageError::QuotaExceeded { key: key.to_string(), needed, limit });
            }
        }
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.map.lock().remove(key);
        Ok(())
    }
}
