//! Logical cache slots used by the client and the session stores.

use bento_core::{Language, Project, ProjectId, User, UserId};
use bento_storage::CacheKey;
use std::time::Duration;

pub const USER_DATA: CacheKey<User> = CacheKey::new("user_data");
pub const USER_ID: CacheKey<UserId> = CacheKey::new("user_id");
pub const PROJECT_ID: CacheKey<ProjectId> = CacheKey::new("project_id");
pub const PROJECT_DATA: CacheKey<Project> = CacheKey::new("project_data");

/// Languages live a day rather than the one-hour default.
pub const SUPPORTED_LANGUAGES: CacheKey<Vec<Language>> =
    CacheKey::with_ttl("supported_languages", Duration::from_millis(86_400_000));

/// Slots removed on logout.
pub const SESSION_SLOTS: [&str; 4] = [
    USER_DATA.name(),
    USER_ID.name(),
    PROJECT_ID.name(),
    PROJECT_DATA.name(),
];
