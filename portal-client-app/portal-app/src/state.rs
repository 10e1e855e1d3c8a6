//! Composition root: one instance of every store for the process lifetime

use std::sync::Arc;

use portal_core::{seed, AuthStore, CommunityStore, CompetitionStore, ProjectStore, StorageError};
use portal_infrastructure::{open_store, FileBackingStore};
use portal_shared::config::AppConfig;

pub struct PortalState {
    pub config: AppConfig,
    pub store: Arc<FileBackingStore>,
    pub auth: AuthStore<FileBackingStore>,
    pub competitions: CompetitionStore<FileBackingStore>,
    pub projects: ProjectStore<FileBackingStore>,
    pub community: CommunityStore<FileBackingStore>,
}

impl PortalState {
    /// With `seed.enabled = false` the stores start empty when nothing is
    /// persisted yet.
    pub fn build(config: AppConfig) -> Result<Self, StorageError> {
        let store = open_store(&config.storage)?;
        let demo = config.seed.enabled;

        let auth = AuthStore::new(store.clone(), if demo { seed::accounts() } else { Vec::new() });
        let competitions =
            CompetitionStore::new(store.clone(), if demo { seed::competitions() } else { Vec::new() });
        let projects = ProjectStore::new(store.clone(), if demo { seed::projects() } else { Vec::new() });
        let community = if demo {
            CommunityStore::new(store.clone(), seed::forum_posts(), seed::team_requests())
        } else {
            CommunityStore::new(store.clone(), Vec::new(), Vec::new())
        };

        Ok(Self { config, store, auth, competitions, projects, community })
    }
}
