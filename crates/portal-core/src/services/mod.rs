//! Domain stores
//!
//! Each store is constructed once at process start and handed to whatever
//! needs it; there is no global instance.

pub mod auth_store;
pub mod competition_store;
pub mod project_store;
pub mod community_store;

pub use auth_store::{AuthStore, SessionState};
pub use competition_store::{CompetitionFilter, CompetitionStore};
pub use project_store::{ProjectFilter, ProjectStore};
pub use community_store::CommunityStore;
