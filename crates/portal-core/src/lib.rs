//! # Portal Core
//! 
//! Domain entities, the generic entity collection engine, and the four
//! domain stores (auth, competitions, projects, community) of the student
//! portal.

pub mod domain;
pub mod error;
pub mod repositories;
pub mod collection;
pub mod services;
pub mod seed;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, StorageError};
pub use repositories::{BackingStore, BackingStoreExt, MemoryBackingStore};
pub use collection::{Entity, EntityCollection, LoadSource, SubscriptionId};
pub use services::{
    AuthStore, CommunityStore, CompetitionFilter, CompetitionStore, ProjectFilter, ProjectStore,
    SessionState,
};
