//! # Portal Core - Domain Module
//! 
//! Domain entities for the student portal.

pub mod user;
pub mod competition;
pub mod project;
pub mod forum_post;
pub mod team_request;

use validator::ValidationError;

// Re-export all entities and enums
pub use user::{User, UserRole, UserPatch, SeedAccount};
pub(crate) use user::{Credential, NewCredential};
pub use competition::{
    Competition, CompetitionCategory, CompetitionLevel, CompetitionStatus, CompetitionDraft,
    CompetitionPatch,
};
pub use project::{
    Project, ProjectCategory, ProjectStatus, ProjectDraft, ProjectPatch, Rating, RatingDraft,
    ProjectComment, ProjectCommentDraft,
};
pub use forum_post::{ForumPost, ForumPostDraft, ForumPostPatch, Comment, CommentDraft};
pub use team_request::{TeamRequest, TeamRequestDraft, TeamRequestPatch};

/// Rejects whitespace-only text, which `length(min = 1)` lets through.
pub(crate) fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}
