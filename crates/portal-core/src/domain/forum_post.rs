//! Forum post and comment entities

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use portal_shared::{new_id, EntityId, Timestamp};

use super::User;
use super::non_blank;
use crate::collection::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: EntityId,
    pub content: String,
    pub author: User,
    pub likes: u64,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub content: String,
    pub author: User,
}

impl CommentDraft {
    pub(crate) fn into_comment(self) -> Comment {
        Comment {
            id: new_id("comment"),
            content: self.content,
            author: self.author,
            likes: 0,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: EntityId,
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"), custom(function = "non_blank"))]
    pub title: String,
    /// Markdown-like body
    pub content: String,
    pub author: User,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ForumPost {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, Validate)]
pub struct ForumPostDraft {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"), custom(function = "non_blank"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content must not be empty"), custom(function = "non_blank"))]
    pub content: String,
    pub author: User,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ForumPostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Tags behave like a set: trimmed, empty ones dropped, first spelling wins.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(tag.to_string());
        }
    }
    out
}

impl Entity for ForumPost {
    type Draft = ForumPostDraft;
    type Patch = ForumPostPatch;

    const ID_PREFIX: &'static str = "post";

    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn create(id: EntityId, now: Timestamp, draft: ForumPostDraft) -> Self {
        ForumPost {
            id,
            title: draft.title.trim().to_string(),
            content: draft.content,
            author: draft.author,
            comments: Vec::new(),
            likes: 0,
            tags: normalize_tags(draft.tags),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: ForumPostPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(tags) = patch.tags {
            self.tags = normalize_tags(tags);
        }
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}
