//! Storage module (file-backed adapters)

pub mod file_store;

pub use file_store::{open_store, FileBackingStore};
