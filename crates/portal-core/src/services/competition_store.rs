// ============================================================================
// Portal Core - Competition Store
// File: crates/portal-core/src/services/competition_store.rs
// ============================================================================
//! Competition listings, moderation, and category subscriptions
//!
//! Public listing paths (`list`, `filter`, `upcoming`, ...) only ever return
//! approved competitions. Moderation views opt in through
//! [`CompetitionStore::list_all`], [`CompetitionStore::pending_approval`] or
//! [`CompetitionFilter::include_unapproved`].

use std::sync::Arc;
use tracing::{error, info, warn};

use portal_shared::constants::{COMPETITIONS_SCHEMA_VERSION, KEY_COMPETITIONS, KEY_SUBSCRIBED_CATEGORIES};
use portal_shared::utils::contains_ignore_case;

use crate::collection::{Entity, EntityCollection, LoadSource, SubscriptionId};
use crate::domain::{
    Competition, CompetitionCategory, CompetitionDraft, CompetitionLevel, CompetitionPatch,
    CompetitionStatus,
};
use crate::error::{DomainError, StorageError};
use crate::repositories::{BackingStore, BackingStoreExt};

/// Every provided field must match; `None` (or blank search) is no constraint.
#[derive(Debug, Clone, Default)]
pub struct CompetitionFilter {
    pub category: Option<CompetitionCategory>,
    pub status: Option<CompetitionStatus>,
    pub level: Option<CompetitionLevel>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    pub include_unapproved: bool,
}

impl CompetitionFilter {
    pub fn category(category: CompetitionCategory) -> Self {
        Self { category: Some(category), ..Default::default() }
    }

    pub fn matches(&self, competition: &Competition) -> bool {
        if !self.include_unapproved && !competition.approved {
            return false;
        }
        if self.category.is_some_and(|c| c != competition.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != competition.status) {
            return false;
        }
        if self.level.is_some_and(|l| l != competition.level) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                contains_ignore_case(&competition.title, text)
                    || contains_ignore_case(&competition.description, text)
            }
            _ => true,
        }
    }
}

pub struct CompetitionStore<S: BackingStore> {
    store: Arc<S>,
    competitions: EntityCollection<Competition, S>,
    subscribed_categories: Vec<CompetitionCategory>,
}

impl<S: BackingStore> CompetitionStore<S> {
    pub fn new(store: Arc<S>, seed: Vec<Competition>) -> Self {
        let competitions = EntityCollection::initialize(
            store.clone(),
            KEY_COMPETITIONS,
            COMPETITIONS_SCHEMA_VERSION,
            seed,
        );
        let subscribed_categories = load_subscriptions(&*store);

        Self { store, competitions, subscribed_categories }
    }

    /// Approved competitions in insertion order.
    pub fn list(&self) -> Vec<Competition> {
        self.competitions.filter(|c| c.approved)
    }

    /// Every competition, approved or not.
    pub fn list_all(&self) -> &[Competition] {
        self.competitions.list()
    }

    pub fn pending_approval(&self) -> Vec<Competition> {
        self.competitions.filter(|c| !c.approved)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Competition> {
        self.competitions.get_by_id(id)
    }

    pub fn add(&mut self, draft: CompetitionDraft) -> Result<Competition, DomainError> {
        draft.check()?;
        let competition = self.competitions.add(draft);
        info!(competition_id = %competition.id, approved = competition.approved, "Competition submitted");
        Ok(competition)
    }

    /// `Ok(None)` when the id is unknown. A patch that breaks validation or
    /// the date ordering is rejected without any write.
    pub fn update(&mut self, id: &str, patch: CompetitionPatch) -> Result<Option<Competition>, DomainError> {
        self.competitions.try_modify(id, |competition| {
            competition.apply(patch);
            competition.check()
        })
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.competitions.remove(id);
        if removed {
            info!(competition_id = %id, "Competition deleted");
        }
        removed
    }

    pub fn approve(&mut self, id: &str) -> Option<Competition> {
        let approved = self.competitions.modify(id, |c| c.approved = true);
        match &approved {
            Some(_) => info!(competition_id = %id, "Competition approved"),
            None => warn!(competition_id = %id, "Cannot approve unknown competition"),
        }
        approved
    }

    pub fn filter(&self, filter: &CompetitionFilter) -> Vec<Competition> {
        self.competitions.filter(|c| filter.matches(c))
    }

    /// Approved upcoming competitions, soonest registration start first.
    pub fn upcoming(&self, limit: usize) -> Vec<Competition> {
        let mut upcoming = self
            .competitions
            .filter(|c| c.approved && c.status == CompetitionStatus::Upcoming);
        sort_by_registration_start(&mut upcoming);
        upcoming.truncate(limit);
        upcoming
    }

    /// Idempotent. Returns whether the category was newly added.
    pub fn subscribe_to_category(&mut self, category: CompetitionCategory) -> bool {
        if self.subscribed_categories.contains(&category) {
            return false;
        }
        self.subscribed_categories.push(category);
        self.persist_subscriptions();
        info!(category = category.as_str(), "Subscribed to category");
        true
    }

    /// Idempotent. Returns whether the category was removed.
    pub fn unsubscribe_from_category(&mut self, category: CompetitionCategory) -> bool {
        let before = self.subscribed_categories.len();
        self.subscribed_categories.retain(|c| *c != category);
        if self.subscribed_categories.len() == before {
            return false;
        }
        self.persist_subscriptions();
        info!(category = category.as_str(), "Unsubscribed from category");
        true
    }

    pub fn subscribed_categories(&self) -> &[CompetitionCategory] {
        &self.subscribed_categories
    }

    pub fn is_subscribed(&self, category: CompetitionCategory) -> bool {
        self.subscribed_categories.contains(&category)
    }

    /// Approved competitions in any subscribed category, soonest
    /// registration start first.
    pub fn subscribed_competitions(&self) -> Vec<Competition> {
        let mut matching = self
            .competitions
            .filter(|c| c.approved && self.subscribed_categories.contains(&c.category));
        sort_by_registration_start(&mut matching);
        matching
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&[Competition]) + Send + Sync + 'static,
    {
        self.competitions.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.competitions.unsubscribe(id)
    }

    pub fn load_source(&self) -> &LoadSource {
        self.competitions.load_source()
    }

    pub fn last_write_error(&self) -> Option<&StorageError> {
        self.competitions.last_write_error()
    }

    fn persist_subscriptions(&self) {
        if let Err(e) = self.store.write_json(KEY_SUBSCRIBED_CATEGORIES, &self.subscribed_categories) {
            error!(error = %e, "Failed to persist subscribed categories");
        }
    }
}

/// Stable: competitions opening on the same instant keep their order.
pub fn sort_by_registration_start(competitions: &mut [Competition]) {
    competitions.sort_by_key(|c| c.registration_start_date);
}

fn load_subscriptions<S: BackingStore>(store: &S) -> Vec<CompetitionCategory> {
    match store.read_json::<Vec<CompetitionCategory>>(KEY_SUBSCRIBED_CATEGORIES) {
        Ok(Some(mut categories)) => {
            let mut seen = Vec::with_capacity(categories.len());
            categories.retain(|c| {
                let fresh = !seen.contains(c);
                seen.push(*c);
                fresh
            });
            categories
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "Subscribed categories unreadable, starting empty");
            Vec::new()
        }
    }
}
