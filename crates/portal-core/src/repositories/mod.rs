//! Backing store port and the in-memory adapter

pub mod backing_store;
pub mod memory_store;

pub use backing_store::{BackingStore, BackingStoreExt};
pub use memory_store::MemoryBackingStore;

#[cfg(test)]
pub use backing_store::MockBackingStore;
