// ============================================================================
// Portal Core - Project Store
// File: crates/portal-core/src/services/project_store.rs
// ============================================================================
//! Project showcase: CRUD, ratings, comments, and showcase queries

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use portal_shared::constants::{KEY_PROJECTS, PROJECTS_SCHEMA_VERSION};
use portal_shared::utils::contains_ignore_case;

use crate::collection::{Entity, EntityCollection, LoadSource, SubscriptionId};
use crate::domain::{Project, ProjectCategory, ProjectCommentDraft, ProjectDraft, ProjectPatch, RatingDraft};
use crate::error::{DomainError, StorageError};
use crate::repositories::BackingStore;

/// All provided fields are AND-combined; `None` or blank text is no constraint.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub category: Option<ProjectCategory>,
    /// Case-insensitive substring of any technology entry.
    pub technology: Option<String>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    pub member_id: Option<String>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        if self.category.is_some_and(|c| c != project.category) {
            return false;
        }
        if let Some(tech) = filter_text(&self.technology) {
            if !project.technologies.iter().any(|t| contains_ignore_case(t, tech)) {
                return false;
            }
        }
        if let Some(text) = filter_text(&self.search) {
            if !contains_ignore_case(&project.title, text) && !contains_ignore_case(&project.description, text) {
                return false;
            }
        }
        if let Some(member_id) = filter_text(&self.member_id) {
            if !project.has_member(member_id) {
                return false;
            }
        }
        true
    }
}

fn filter_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub struct ProjectStore<S: BackingStore> {
    projects: EntityCollection<Project, S>,
}

impl<S: BackingStore> ProjectStore<S> {
    pub fn new(store: Arc<S>, seed: Vec<Project>) -> Self {
        Self {
            projects: EntityCollection::initialize(store, KEY_PROJECTS, PROJECTS_SCHEMA_VERSION, seed),
        }
    }

    pub fn list(&self) -> &[Project] {
        self.projects.list()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Project> {
        self.projects.get_by_id(id)
    }

    pub fn add(&mut self, draft: ProjectDraft) -> Result<Project, DomainError> {
        draft.validate()?;
        let project = self.projects.add(draft);
        info!(project_id = %project.id, owner_id = %project.owner_id, "Project created");
        Ok(project)
    }

    pub fn update(&mut self, id: &str, patch: ProjectPatch) -> Result<Option<Project>, DomainError> {
        self.projects.try_modify(id, |project| {
            project.apply(patch);
            project.validate().map_err(DomainError::from)
        })
    }

    /// Team requests pointing at the project are left alone; the community
    /// store owns those.
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.projects.remove(id);
        if removed {
            info!(project_id = %id, "Project deleted");
        }
        removed
    }

    pub fn filter(&self, filter: &ProjectFilter) -> Vec<Project> {
        self.projects.filter(|p| filter.matches(p))
    }

    /// A second rating from the same user replaces the first at the same
    /// position. Out-of-range values are rejected before anything is written.
    pub fn rate_project(&mut self, project_id: &str, draft: RatingDraft) -> Result<Project, DomainError> {
        draft.validate()?;
        let rating = draft.into_rating(project_id);
        let user_id = rating.user_id.clone();

        let project = self
            .projects
            .modify(project_id, |p| p.upsert_rating(rating))
            .ok_or_else(|| {
                warn!(project_id, "Cannot rate unknown project");
                DomainError::not_found("Project", project_id)
            })?;

        info!(project_id, user_id = %user_id, average = project.average_rating(), "Project rated");
        Ok(project)
    }

    /// `Ok(None)` when the project is unknown.
    pub fn add_comment(
        &mut self,
        project_id: &str,
        draft: ProjectCommentDraft,
    ) -> Result<Option<Project>, DomainError> {
        if draft.content.trim().is_empty() {
            return Err(DomainError::ValidationError("Comment must not be empty".to_string()));
        }
        let comment = draft.into_comment();
        Ok(self.projects.modify(project_id, |p| p.comments.push(comment)))
    }

    pub fn average_rating(&self, project_id: &str) -> Option<f64> {
        self.get_by_id(project_id).map(Project::average_rating)
    }

    /// Highest average first; ties keep insertion order.
    pub fn top_rated(&self, limit: usize) -> Vec<Project> {
        let mut ranked = self.projects.list().to_vec();
        ranked.sort_by(|a, b| b.average_rating().total_cmp(&a.average_rating()));
        ranked.truncate(limit);
        ranked
    }

    /// Distinct technologies across all projects, sorted case-insensitively.
    /// The first spelling seen wins.
    pub fn available_technologies(&self) -> Vec<String> {
        let mut seen: BTreeMap<String, String> = BTreeMap::new();
        for tech in self.projects.list().iter().flat_map(|p| p.technologies.iter()) {
            let trimmed = tech.trim();
            if !trimmed.is_empty() {
                seen.entry(trimmed.to_lowercase()).or_insert_with(|| trimmed.to_string());
            }
        }
        seen.into_values().collect()
    }

    pub fn projects_owned_by(&self, user_id: &str) -> Vec<Project> {
        self.projects.filter(|p| p.owner_id == user_id)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&[Project]) + Send + Sync + 'static,
    {
        self.projects.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.projects.unsubscribe(id)
    }

    pub fn load_source(&self) -> &LoadSource {
        self.projects.load_source()
    }

    pub fn last_write_error(&self) -> Option<&StorageError> {
        self.projects.last_write_error()
    }
}
