//! Backing store trait (port)
//!
//! A passive, durable key-value mirror: raw text in, raw text out. No
//! transactions and no atomicity across keys; a crash between an in-memory
//! mutation and its write loses that mutation.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;

#[cfg_attr(test, mockall::automock)]
pub trait BackingStore: Send + Sync {
    /// `Ok(None)` when the key was never written or has been removed.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed JSON access on top of any [`BackingStore`].
pub trait BackingStoreExt: BackingStore {
    /// Absent and corrupt are kept apart: a payload that does not parse
    /// comes back as [`StorageError::Corrupt`], never as `Ok(None)`.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.read(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Corrupt { key: key.to_string(), message: e.to_string() }),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialization { key: key.to_string(), message: e.to_string() })?;
        self.write(key, &raw)
    }
}

impl<S: BackingStore + ?Sized> BackingStoreExt for S {}
