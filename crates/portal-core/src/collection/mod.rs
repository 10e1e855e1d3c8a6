//! Generic entity collection engine
//!
//! One typed collection held in memory, seeded from the backing store or a
//! fallback dataset, mirrored back to the backing store after every mutation.

pub mod entity;
pub mod observer;
pub mod entity_collection;

pub use entity::Entity;
pub use observer::{Observers, SubscriptionId};
pub use entity_collection::{EntityCollection, LoadSource};
