//! Team request entity (team matching)

use serde::{Deserialize, Serialize};
use validator::Validate;

use portal_shared::{EntityId, Timestamp};

use super::non_blank;
use crate::collection::Entity;

fn default_positions_open() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"), custom(function = "non_blank"))]
    pub description: String,
    pub required_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Timestamp>,
    pub contact_info: String,
    pub user_id: EntityId,
    pub user_name: String,
    #[validate(range(min = 1, max = 20, message = "Positions open must be between 1 and 20"))]
    #[serde(default = "default_positions_open")]
    pub positions_open: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TeamRequest {
    pub fn requires_skill(&self, skill: &str) -> bool {
        self.required_skills
            .iter()
            .any(|s| portal_shared::utils::contains_ignore_case(s, skill))
    }
}

#[derive(Debug, Clone, Validate)]
pub struct TeamRequestDraft {
    pub project_id: Option<EntityId>,
    pub project_title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"), custom(function = "non_blank"))]
    pub description: String,
    pub required_skills: Vec<String>,
    pub deadline: Option<Timestamp>,
    pub contact_info: String,
    pub user_id: EntityId,
    pub user_name: String,
    #[validate(range(min = 1, max = 20, message = "Positions open must be between 1 and 20"))]
    pub positions_open: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TeamRequestPatch {
    pub project_id: Option<Option<EntityId>>,
    pub project_title: Option<Option<String>>,
    pub description: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub deadline: Option<Option<Timestamp>>,
    pub contact_info: Option<String>,
    pub positions_open: Option<u32>,
}

impl Entity for TeamRequest {
    type Draft = TeamRequestDraft;
    type Patch = TeamRequestPatch;

    const ID_PREFIX: &'static str = "request";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn create(id: EntityId, now: Timestamp, draft: TeamRequestDraft) -> Self {
        TeamRequest {
            id,
            project_id: draft.project_id,
            project_title: draft.project_title,
            description: draft.description,
            required_skills: draft.required_skills,
            deadline: draft.deadline,
            contact_info: draft.contact_info,
            user_id: draft.user_id,
            user_name: draft.user_name,
            positions_open: draft.positions_open,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: TeamRequestPatch) {
        if let Some(v) = patch.project_id {
            self.project_id = v;
        }
        if let Some(v) = patch.project_title {
            self.project_title = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.required_skills {
            self.required_skills = v;
        }
        if let Some(v) = patch.deadline {
            self.deadline = v;
        }
        if let Some(v) = patch.contact_info {
            self.contact_info = v;
        }
        if let Some(v) = patch.positions_open {
            self.positions_open = v;
        }
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}
