// ============================================================================
// Portal Core - User Entity
// File: crates/portal-core/src/domain/user.rs
// Description: Portal user, role, and the credential record kept by auth
// ============================================================================

use serde::{Deserialize, Serialize};
use validator::Validate;

use portal_shared::{EntityId, Timestamp};

use super::non_blank;
use crate::collection::Entity;

/// User role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Guest,
    Student,
    Lecturer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Guest => "guest",
            UserRole::Student => "student",
            UserRole::Lecturer => "lecturer",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "guest" => Some(UserRole::Guest),
            "student" => Some(UserRole::Student),
            "lecturer" => Some(UserRole::Lecturer),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Student
    }
}

/// Portal user. Also embedded as a snapshot in projects and forum posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"), custom(function = "non_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub role: UserRole,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Lecturers and admins may publish competitions.
    pub fn can_manage_competitions(&self) -> bool {
        matches!(self.role, UserRole::Lecturer | UserRole::Admin)
    }
}

/// Profile fields a signed-in user may change.
#[derive(Debug, Clone, Default, Validate)]
pub struct UserPatch {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"), custom(function = "non_blank"))]
    pub name: Option<String>,
    pub avatar: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub skills: Option<Vec<String>>,
    pub university: Option<Option<String>>,
    pub faculty: Option<Option<String>>,
}

impl UserPatch {
    fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(skills) = self.skills {
            user.skills = skills;
        }
        if let Some(university) = self.university {
            user.university = university;
        }
        if let Some(faculty) = self.faculty {
            user.faculty = faculty;
        }
    }
}

/// Demo account with a plaintext password; hashed before it is stored.
#[derive(Debug, Clone)]
pub struct SeedAccount {
    pub user: User,
    pub password: String,
}

/// Stored login record. Never leaves the auth store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Credential {
    #[serde(flatten)]
    pub user: User,
    pub password_hash: String,
}

pub(crate) struct NewCredential {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password_hash: String,
}

impl Entity for Credential {
    type Draft = NewCredential;
    type Patch = UserPatch;

    const ID_PREFIX: &'static str = "user";

    fn id(&self) -> &str {
        &self.user.id
    }

    fn updated_at(&self) -> Timestamp {
        self.user.updated_at
    }

    fn create(id: EntityId, now: Timestamp, draft: NewCredential) -> Self {
        Credential {
            user: User {
                id,
                name: draft.name.trim().to_string(),
                email: draft.email.trim().to_string(),
                role: draft.role,
                avatar: None,
                bio: None,
                skills: Vec::new(),
                university: None,
                faculty: None,
                created_at: now,
                updated_at: now,
            },
            password_hash: draft.password_hash,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        patch.apply_to(&mut self.user);
    }

    fn touch(&mut self, now: Timestamp) {
        self.user.updated_at = now;
    }
}
