//! Application-wide constants

// Backing store keys
pub const KEY_CURRENT_USER: &str = "currentUser";
pub const KEY_USERS: &str = "users";
pub const KEY_COMPETITIONS: &str = "competitions";
pub const KEY_SUBSCRIBED_CATEGORIES: &str = "subscribedCategories";
pub const KEY_PROJECTS: &str = "projects";
pub const KEY_FORUM_POSTS: &str = "forumPosts";
pub const KEY_TEAM_REQUESTS: &str = "teamRequests";

/// Suffix of the key holding a collection's schema version tag.
pub const VERSION_KEY_SUFFIX: &str = "_version";

// Schema versions, bump when a persisted record shape changes
pub const USERS_SCHEMA_VERSION: &str = "1";
pub const COMPETITIONS_SCHEMA_VERSION: &str = "1";
pub const PROJECTS_SCHEMA_VERSION: &str = "2";
pub const FORUM_POSTS_SCHEMA_VERSION: &str = "1";
pub const TEAM_REQUESTS_SCHEMA_VERSION: &str = "1";

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Browser local storage quota most engines enforce per origin.
pub const DEFAULT_STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;
