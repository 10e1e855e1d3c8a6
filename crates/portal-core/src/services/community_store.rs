// ============================================================================
// Portal Core - Community Store
// File: crates/portal-core/src/services/community_store.rs
// ============================================================================
//! Forum posts and team requests
//!
//! Two independent collections behind one store. Listings keep insertion
//! order; the `recent_*` queries sort newest first.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use portal_shared::constants::{
    FORUM_POSTS_SCHEMA_VERSION, KEY_FORUM_POSTS, KEY_TEAM_REQUESTS, TEAM_REQUESTS_SCHEMA_VERSION,
};
use portal_shared::utils::contains_ignore_case;

use crate::collection::{Entity, EntityCollection, SubscriptionId};
use crate::domain::{
    CommentDraft, ForumPost, ForumPostDraft, ForumPostPatch, TeamRequest, TeamRequestDraft,
    TeamRequestPatch,
};
use crate::error::{DomainError, StorageError};
use crate::repositories::BackingStore;

pub struct CommunityStore<S: BackingStore> {
    forum_posts: EntityCollection<ForumPost, S>,
    team_requests: EntityCollection<TeamRequest, S>,
}

impl<S: BackingStore> CommunityStore<S> {
    pub fn new(store: Arc<S>, seed_posts: Vec<ForumPost>, seed_requests: Vec<TeamRequest>) -> Self {
        Self {
            forum_posts: EntityCollection::initialize(
                store.clone(),
                KEY_FORUM_POSTS,
                FORUM_POSTS_SCHEMA_VERSION,
                seed_posts,
            ),
            team_requests: EntityCollection::initialize(
                store,
                KEY_TEAM_REQUESTS,
                TEAM_REQUESTS_SCHEMA_VERSION,
                seed_requests,
            ),
        }
    }

    // ------------------------------------------------------------------
    // Forum posts
    // ------------------------------------------------------------------

    pub fn forum_posts(&self) -> &[ForumPost] {
        self.forum_posts.list()
    }

    pub fn get_forum_post_by_id(&self, id: &str) -> Option<&ForumPost> {
        self.forum_posts.get_by_id(id)
    }

    pub fn add_forum_post(&mut self, draft: ForumPostDraft) -> Result<ForumPost, DomainError> {
        draft.validate()?;
        ensure_not_blank(&draft.content, "Content")?;
        let post = self.forum_posts.add(draft);
        info!(post_id = %post.id, author_id = %post.author.id, "Forum post created");
        Ok(post)
    }

    pub fn update_forum_post(
        &mut self,
        id: &str,
        patch: ForumPostPatch,
    ) -> Result<Option<ForumPost>, DomainError> {
        self.forum_posts.try_modify(id, |post| {
            post.apply(patch);
            post.validate()?;
            ensure_not_blank(&post.content, "Content")
        })
    }

    pub fn delete_forum_post(&mut self, id: &str) -> bool {
        self.forum_posts.remove(id)
    }

    /// `Ok(None)` when the post is unknown; nothing is written then.
    pub fn add_comment(&mut self, post_id: &str, draft: CommentDraft) -> Result<Option<ForumPost>, DomainError> {
        ensure_not_blank(&draft.content, "Comment")?;
        let comment = draft.into_comment();
        Ok(self.forum_posts.modify(post_id, |post| post.comments.push(comment)))
    }

    pub fn like_post(&mut self, post_id: &str) -> Option<ForumPost> {
        self.forum_posts.modify(post_id, |post| post.likes += 1)
    }

    /// `None` when either the post or the comment is unknown.
    pub fn like_comment(&mut self, post_id: &str, comment_id: &str) -> Option<ForumPost> {
        let liked = self.forum_posts.try_modify(post_id, |post| -> Result<(), ()> {
            let comment = post.comments.iter_mut().find(|c| c.id == comment_id).ok_or(())?;
            comment.likes += 1;
            Ok(())
        });
        match liked {
            Ok(post) => post,
            Err(()) => {
                debug!(post_id, comment_id, "Cannot like unknown comment");
                None
            }
        }
    }

    /// Matching posts, newest first. Search covers title and content; the
    /// tag must match exactly, ignoring case.
    pub fn filter_posts(&self, search: Option<&str>, tag: Option<&str>) -> Vec<ForumPost> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let tag = tag.map(str::trim).filter(|t| !t.is_empty());

        let mut posts = self.forum_posts.filter(|post| {
            let text_ok = search.map_or(true, |text| {
                contains_ignore_case(&post.title, text) || contains_ignore_case(&post.content, text)
            });
            text_ok && tag.map_or(true, |t| post.has_tag(t))
        });
        newest_first(&mut posts, |p| p.created_at);
        posts
    }

    pub fn recent_posts(&self, limit: usize) -> Vec<ForumPost> {
        let mut posts = self.forum_posts.list().to_vec();
        newest_first(&mut posts, |p| p.created_at);
        posts.truncate(limit);
        posts
    }

    /// Distinct tags across all posts, sorted case-insensitively.
    pub fn available_tags(&self) -> Vec<String> {
        distinct_sorted(self.forum_posts.list().iter().flat_map(|p| p.tags.iter()))
    }

    pub fn subscribe_posts<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&[ForumPost]) + Send + Sync + 'static,
    {
        self.forum_posts.subscribe(callback)
    }

    pub fn unsubscribe_posts(&mut self, id: SubscriptionId) -> bool {
        self.forum_posts.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Team requests
    // ------------------------------------------------------------------

    pub fn team_requests(&self) -> &[TeamRequest] {
        self.team_requests.list()
    }

    pub fn get_team_request_by_id(&self, id: &str) -> Option<&TeamRequest> {
        self.team_requests.get_by_id(id)
    }

    pub fn add_team_request(&mut self, draft: TeamRequestDraft) -> Result<TeamRequest, DomainError> {
        draft.validate()?;
        let request = self.team_requests.add(draft);
        info!(request_id = %request.id, user_id = %request.user_id, "Team request created");
        Ok(request)
    }

    pub fn update_team_request(
        &mut self,
        id: &str,
        patch: TeamRequestPatch,
    ) -> Result<Option<TeamRequest>, DomainError> {
        self.team_requests.try_modify(id, |request| {
            request.apply(patch);
            request.validate().map_err(DomainError::from)
        })
    }

    pub fn delete_team_request(&mut self, id: &str) -> bool {
        self.team_requests.remove(id)
    }

    /// All requests when `skill` is `None` or blank; otherwise those with a
    /// required skill containing it, ignoring case.
    pub fn filter_team_requests(&self, skill: Option<&str>) -> Vec<TeamRequest> {
        match skill.map(str::trim).filter(|s| !s.is_empty()) {
            Some(skill) => self.team_requests.filter(|r| r.requires_skill(skill)),
            None => self.team_requests.list().to_vec(),
        }
    }

    /// Requests whose project title or description contains `search`.
    pub fn filter_team_requests_by_text(&self, search: &str) -> Vec<TeamRequest> {
        let search = search.trim();
        if search.is_empty() {
            return self.team_requests.list().to_vec();
        }
        self.team_requests.filter(|r| {
            r.project_title.as_deref().is_some_and(|t| contains_ignore_case(t, search))
                || contains_ignore_case(&r.description, search)
        })
    }

    /// Requests still pointing at `project_id`. Deleting a project does not
    /// touch these.
    pub fn team_requests_for_project(&self, project_id: &str) -> Vec<TeamRequest> {
        self.team_requests
            .filter(|r| r.project_id.as_deref() == Some(project_id))
    }

    pub fn recent_team_requests(&self, limit: usize) -> Vec<TeamRequest> {
        let mut requests = self.team_requests.list().to_vec();
        newest_first(&mut requests, |r| r.created_at);
        requests.truncate(limit);
        requests
    }

    pub fn available_skills(&self) -> Vec<String> {
        distinct_sorted(self.team_requests.list().iter().flat_map(|r| r.required_skills.iter()))
    }

    pub fn subscribe_team_requests<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&[TeamRequest]) + Send + Sync + 'static,
    {
        self.team_requests.subscribe(callback)
    }

    pub fn unsubscribe_team_requests(&mut self, id: SubscriptionId) -> bool {
        self.team_requests.unsubscribe(id)
    }

    /// Most recent write failure of either collection.
    pub fn last_write_error(&self) -> Option<&StorageError> {
        self.forum_posts
            .last_write_error()
            .or_else(|| self.team_requests.last_write_error())
    }
}

fn ensure_not_blank(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Stable, so records created on the same instant keep insertion order.
fn newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> K) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for value in values {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            seen.entry(trimmed.to_lowercase()).or_insert_with(|| trimmed.to_string());
        }
    }
    seen.into_values().collect()
}
