// ============================================================================
// Portal Core - Project Entity
// File: crates/portal-core/src/domain/project.rs
// Description: Project showcase with ratings and comments
// ============================================================================

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use portal_shared::{new_id, EntityId, Timestamp};

use super::User;
use super::non_blank;
use crate::collection::Entity;

/// Project category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile App")]
    MobileApp,
    #[serde(rename = "AI/ML")]
    AiMl,
    #[serde(rename = "IoT")]
    Iot,
    #[serde(rename = "Game Development")]
    GameDevelopment,
    #[serde(rename = "Graphic Design")]
    GraphicDesign,
    Other,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::WebDevelopment => "Web Development",
            ProjectCategory::MobileApp => "Mobile App",
            ProjectCategory::AiMl => "AI/ML",
            ProjectCategory::Iot => "IoT",
            ProjectCategory::GameDevelopment => "Game Development",
            ProjectCategory::GraphicDesign => "Graphic Design",
            ProjectCategory::Other => "Other",
        }
    }
}

impl Default for ProjectCategory {
    fn default() -> Self {
        ProjectCategory::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    InProgress,
    Completed,
    OnHold,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::InProgress
    }
}

/// One user's rating of a project. At most one per (project, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: EntityId,
    pub user_id: EntityId,
    pub user_name: String,
    pub project_id: EntityId,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Validate)]
pub struct RatingDraft {
    pub user_id: EntityId,
    pub user_name: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    pub comment: Option<String>,
}

impl RatingDraft {
    pub fn new(user_id: &str, user_name: &str, rating: u8) -> Self {
        Self { user_id: user_id.to_string(), user_name: user_name.to_string(), rating, comment: None }
    }

    pub(crate) fn into_rating(self, project_id: &str) -> Rating {
        Rating {
            id: new_id("rating"),
            user_id: self.user_id,
            user_name: self.user_name,
            project_id: project_id.to_string(),
            rating: f64::from(self.rating),
            comment: self.comment,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectComment {
    pub id: EntityId,
    pub user_id: EntityId,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct ProjectCommentDraft {
    pub user_id: EntityId,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub content: String,
}

impl ProjectCommentDraft {
    pub(crate) fn into_comment(self) -> ProjectComment {
        ProjectComment {
            id: new_id("comment"),
            user_id: self.user_id,
            user_name: self.user_name,
            user_avatar: self.user_avatar,
            content: self.content,
            created_at: Utc::now(),
        }
    }
}

/// Project entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"), custom(function = "non_blank"))]
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    #[validate(custom(function = "validate_technologies"))]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_link: Option<String>,

    pub members: Vec<User>,
    pub owner_id: EntityId,
    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenges: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_improvements: Option<String>,

    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub comments: Vec<ProjectComment>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Mean of all ratings, 0 when there are none.
    pub fn average_rating(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        let total: f64 = self.ratings.iter().map(|r| r.rating).sum();
        total / self.ratings.len() as f64
    }

    pub fn rating_by(&self, user_id: &str) -> Option<&Rating> {
        self.ratings.iter().find(|r| r.user_id == user_id)
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }

    /// Replaces the user's previous rating in place, or appends.
    pub(crate) fn upsert_rating(&mut self, rating: Rating) {
        match self.ratings.iter().position(|r| r.user_id == rating.user_id) {
            Some(index) => self.ratings[index] = rating,
            None => self.ratings.push(rating),
        }
    }
}

fn validate_technologies(technologies: &[String]) -> Result<(), ValidationError> {
    if technologies.iter().any(|t| t.trim().is_empty()) {
        let mut err = ValidationError::new("blank_technology");
        err.message = Some("Technologies must not contain blank entries".into());
        return Err(err);
    }
    Ok(())
}

/// Fields supplied when a project is created
#[derive(Debug, Clone, Default, Validate)]
pub struct ProjectDraft {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"), custom(function = "non_blank"))]
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    #[validate(custom(function = "validate_technologies"))]
    pub technologies: Vec<String>,
    pub images: Vec<String>,
    pub video_link: Option<String>,
    pub repository_link: Option<String>,
    pub demo_link: Option<String>,
    pub members: Vec<User>,
    pub owner_id: EntityId,
    pub status: ProjectStatus,
    pub features: Vec<String>,
    pub challenges: Option<String>,
    pub future_improvements: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ProjectCategory>,
    pub technologies: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub video_link: Option<Option<String>>,
    pub repository_link: Option<Option<String>>,
    pub demo_link: Option<Option<String>>,
    pub members: Option<Vec<User>>,
    pub status: Option<ProjectStatus>,
    pub features: Option<Vec<String>>,
    pub challenges: Option<Option<String>>,
    pub future_improvements: Option<Option<String>>,
}

impl Entity for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const ID_PREFIX: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn create(id: EntityId, now: Timestamp, draft: ProjectDraft) -> Self {
        Project {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            category: draft.category,
            technologies: draft.technologies,
            images: draft.images,
            video_link: draft.video_link,
            repository_link: draft.repository_link,
            demo_link: draft.demo_link,
            members: draft.members,
            owner_id: draft.owner_id,
            status: draft.status,
            features: draft.features,
            challenges: draft.challenges,
            future_improvements: draft.future_improvements,
            ratings: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: ProjectPatch) {
        if let Some(v) = patch.title {
            self.title = v.trim().to_string();
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.technologies {
            self.technologies = v;
        }
        if let Some(v) = patch.images {
            self.images = v;
        }
        if let Some(v) = patch.video_link {
            self.video_link = v;
        }
        if let Some(v) = patch.repository_link {
            self.repository_link = v;
        }
        if let Some(v) = patch.demo_link {
            self.demo_link = v;
        }
        if let Some(v) = patch.members {
            self.members = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.features {
            self.features = v;
        }
        if let Some(v) = patch.challenges {
            self.challenges = v;
        }
        if let Some(v) = patch.future_improvements {
            self.future_improvements = v;
        }
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}
