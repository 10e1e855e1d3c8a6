// ============================================================================
// Portal Core - Competition Entity
// File: crates/portal-core/src/domain/competition.rs
// Description: Competition listing with lifecycle dates and approval gate
// ============================================================================

use serde::{Deserialize, Serialize};
use validator::Validate;

use portal_shared::{EntityId, Timestamp};

use super::non_blank;
use crate::collection::Entity;
use crate::error::DomainError;

/// Competition category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompetitionCategory {
    #[serde(rename = "IT")]
    InformationTechnology,
    Design,
    Business,
    Science,
    Engineering,
    Arts,
    Other,
}

impl CompetitionCategory {
    pub const ALL: [CompetitionCategory; 7] = [
        CompetitionCategory::InformationTechnology,
        CompetitionCategory::Design,
        CompetitionCategory::Business,
        CompetitionCategory::Science,
        CompetitionCategory::Engineering,
        CompetitionCategory::Arts,
        CompetitionCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionCategory::InformationTechnology => "IT",
            CompetitionCategory::Design => "Design",
            CompetitionCategory::Business => "Business",
            CompetitionCategory::Science => "Science",
            CompetitionCategory::Engineering => "Engineering",
            CompetitionCategory::Arts => "Arts",
            CompetitionCategory::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl Default for CompetitionCategory {
    fn default() -> Self {
        CompetitionCategory::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    National,
    International,
}

impl CompetitionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionLevel::National => "national",
            CompetitionLevel::International => "international",
        }
    }
}

impl Default for CompetitionLevel {
    fn default() -> Self {
        CompetitionLevel::National
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl CompetitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionStatus::Upcoming => "upcoming",
            CompetitionStatus::Ongoing => "ongoing",
            CompetitionStatus::Completed => "completed",
        }
    }
}

impl Default for CompetitionStatus {
    fn default() -> Self {
        CompetitionStatus::Upcoming
    }
}

/// Competition entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: EntityId,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"), custom(function = "non_blank"))]
    pub title: String,
    pub description: String,
    pub requirements: String,

    pub category: CompetitionCategory,
    pub level: CompetitionLevel,
    pub status: CompetitionStatus,

    pub registration_start_date: Timestamp,
    pub registration_end_date: Timestamp,
    pub submission_deadline: Timestamp,
    pub announcement_date: Timestamp,

    pub organizer: String,
    pub prize: String,
    #[validate(url(message = "Registration link must be a URL"))]
    pub registration_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub created_by: EntityId,
    pub approved: bool,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Competition {
    pub fn check_timeline(&self) -> Result<(), DomainError> {
        check_timeline(
            self.registration_start_date,
            self.registration_end_date,
            self.submission_deadline,
            self.announcement_date,
        )
    }

    /// Field validation plus the lifecycle date ordering.
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()?;
        self.check_timeline()
    }
}

/// Fields supplied when a competition is submitted
#[derive(Debug, Clone, Default, Validate)]
pub struct CompetitionDraft {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"), custom(function = "non_blank"))]
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub category: CompetitionCategory,
    pub level: CompetitionLevel,
    pub status: CompetitionStatus,
    pub registration_start_date: Timestamp,
    pub registration_end_date: Timestamp,
    pub submission_deadline: Timestamp,
    pub announcement_date: Timestamp,
    pub organizer: String,
    pub prize: String,
    #[validate(url(message = "Registration link must be a URL"))]
    pub registration_link: String,
    pub image: Option<String>,
    pub created_by: EntityId,
    pub approved: bool,
}

impl CompetitionDraft {
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()?;
        check_timeline(
            self.registration_start_date,
            self.registration_end_date,
            self.submission_deadline,
            self.announcement_date,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompetitionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub category: Option<CompetitionCategory>,
    pub level: Option<CompetitionLevel>,
    pub status: Option<CompetitionStatus>,
    pub registration_start_date: Option<Timestamp>,
    pub registration_end_date: Option<Timestamp>,
    pub submission_deadline: Option<Timestamp>,
    pub announcement_date: Option<Timestamp>,
    pub organizer: Option<String>,
    pub prize: Option<String>,
    pub registration_link: Option<String>,
    pub image: Option<Option<String>>,
    pub approved: Option<bool>,
}

fn check_timeline(
    registration_start: Timestamp,
    registration_end: Timestamp,
    submission_deadline: Timestamp,
    announcement: Timestamp,
) -> Result<(), DomainError> {
    if registration_start > registration_end {
        return Err(DomainError::ValidationError(
            "Registration start must not be after registration end".to_string(),
        ));
    }
    if registration_end > submission_deadline {
        return Err(DomainError::ValidationError(
            "Registration end must not be after the submission deadline".to_string(),
        ));
    }
    if submission_deadline > announcement {
        return Err(DomainError::ValidationError(
            "Submission deadline must not be after the announcement date".to_string(),
        ));
    }
    Ok(())
}

impl Entity for Competition {
    type Draft = CompetitionDraft;
    type Patch = CompetitionPatch;

    const ID_PREFIX: &'static str = "competition";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn create(id: EntityId, now: Timestamp, draft: CompetitionDraft) -> Self {
        Competition {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            requirements: draft.requirements,
            category: draft.category,
            level: draft.level,
            status: draft.status,
            registration_start_date: draft.registration_start_date,
            registration_end_date: draft.registration_end_date,
            submission_deadline: draft.submission_deadline,
            announcement_date: draft.announcement_date,
            organizer: draft.organizer,
            prize: draft.prize,
            registration_link: draft.registration_link,
            image: draft.image,
            created_by: draft.created_by,
            approved: draft.approved,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: CompetitionPatch) {
        if let Some(v) = patch.title {
            self.title = v.trim().to_string();
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.requirements {
            self.requirements = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.level {
            self.level = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.registration_start_date {
            self.registration_start_date = v;
        }
        if let Some(v) = patch.registration_end_date {
            self.registration_end_date = v;
        }
        if let Some(v) = patch.submission_deadline {
            self.submission_deadline = v;
        }
        if let Some(v) = patch.announcement_date {
            self.announcement_date = v;
        }
        if let Some(v) = patch.organizer {
            self.organizer = v;
        }
        if let Some(v) = patch.prize {
            self.prize = v;
        }
        if let Some(v) = patch.registration_link {
            self.registration_link = v;
        }
        if let Some(v) = patch.image {
            self.image = v;
        }
        if let Some(v) = patch.approved {
            self.approved = v;
        }
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}
