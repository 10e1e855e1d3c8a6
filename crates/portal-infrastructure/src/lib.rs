//! # Portal Infrastructure
//! 
//! Backing store implementations (adapters).

pub mod storage;

pub use storage::{open_store, FileBackingStore};
