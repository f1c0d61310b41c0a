//! Cache-backed views of the current user, project and language list.

use crate::cache_keys::{PROJECT_DATA, PROJECT_ID, SUPPORTED_LANGUAGES, USER_DATA, USER_ID};
use crate::error::{ClientError, ClientResult};
use crate::route::Route;
use bento_core::{merge_languages, normalize_languages, Language, Project, ProjectId, User, ValidationError};
use bento_storage::{Cache, CacheKey, StorageError};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Read a slot, treating an unreadable one as absent. The slot is removed
/// so the next write starts clean.
fn read_or_discard<T: DeserializeOwned>(cache: &Cache, key: &CacheKey<T>) -> ClientResult<Option<T>> {
    match cache.get(key) {
        Ok(value) => Ok(value),
        Err(StorageError::Corrupt { reason, .. }) => {
            tracing::warn!(key = key.name(), reason = %reason, "Discarding unreadable cache slot");
            cache.remove(key)?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// USER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }

    /// Anonymous sessions belong on the login page.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            SessionState::Anonymous => Some(Route::Login),
            SessionState::Authenticated(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserSession {
    cache: Cache,
}

impl UserSession {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// Authenticated only when both the user record and the user id are
    /// cached; a registered-but-not-logged-in user has only the former.
    /// Unreadable slots are dropped and count as missing.
    pub fn load(&self) -> ClientResult<SessionState> {
        let user = read_or_discard(&self.cache, &USER_DATA)?;
        let user_id = read_or_discard(&self.cache, &USER_ID)?;
        match (user, user_id) {
            (Some(user), Some(_)) => Ok(SessionState::Authenticated(user)),
            _ => Ok(SessionState::Anonymous),
        }
    }

    pub fn require_user(&self) -> ClientResult<User> {
        match self.load()? {
            SessionState::Authenticated(user) => Ok(user),
            SessionState::Anonymous => Err(ClientError::NotAuthenticated),
        }
    }

    /// Replace the cached user record. The write starts a fresh TTL.
    pub fn store_user(&self, user: &User) -> ClientResult<()> {
        self.cache.set(&USER_DATA, user)?;
        Ok(())
    }

    pub fn clear_user(&self) -> ClientResult<()> {
        self.cache.remove(&USER_DATA)?;
        self.cache.remove(&USER_ID)?;
        self.cache.remove(&PROJECT_ID)?;
        Ok(())
    }
}

// ============================================================================
// PROJECT
// ============================================================================

/// The project context every key and member call is scoped to.
#[derive(Debug, Clone)]
pub struct ProjectSelection {
    cache: Cache,
    current: Option<Project>,
}

impl ProjectSelection {
    /// A selection exists only when both the id and the record are cached.
    pub fn load(cache: Cache) -> ClientResult<Self> {
        let project_id = read_or_discard(&cache, &PROJECT_ID)?;
        let project = read_or_discard(&cache, &PROJECT_DATA)?;
        let current = match (project_id, project) {
            (Some(_), Some(project)) => Some(project),
            _ => None,
        };
        Ok(Self { cache, current })
    }

    pub fn current(&self) -> Option<&Project> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<ProjectId> {
        self.current.as_ref().map(|p| p.project_id)
    }

    /// Write the full record and the denormalised id, then adopt it locally.
    pub fn update_project(&mut self, project: Project) -> ClientResult<()> {
        self.cache.set(&PROJECT_ID, &project.project_id)?;
        self.cache.set(&PROJECT_DATA, &project)?;
        tracing::debug!(project_id = %project.project_id, "Selected project");
        self.current = Some(project);
        Ok(())
    }

    pub fn select_by_id(&mut self, projects: &[Project], project_id: ProjectId) -> ClientResult<Project> {
        let project = projects
            .iter()
            .find(|p| p.project_id == project_id)
            .cloned()
            .ok_or_else(|| {
                ValidationError::invalid("project", format!("no project with id {}", project_id))
            })?;
        self.update_project(project.clone())?;
        Ok(project)
    }

    /// Forget the local selection. The cache is handled by the session.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

// ============================================================================
// LANGUAGES
// ============================================================================

/// Languages the current project is translated into.
#[derive(Debug, Clone)]
pub struct LanguageStore {
    cache: Cache,
    ttl: Duration,
    languages: Vec<Language>,
}

impl LanguageStore {
    /// Read the cached list. Entries written with regional codes are
    /// normalised and written back; an unreadable slot is discarded.
    pub fn load(cache: Cache, ttl: Duration) -> ClientResult<Self> {
        let cached = read_or_discard(&cache, &SUPPORTED_LANGUAGES)?.unwrap_or_default();

        let languages = normalize_languages(&cached);
        if languages != cached {
            cache.set_with_ttl(&SUPPORTED_LANGUAGES, &languages, ttl)?;
        }
        Ok(Self {
            cache,
            ttl,
            languages,
        })
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Drop the in-memory list and read the cache again, e.g. after the
    /// namespace has been wiped.
    pub fn reload(&mut self) -> ClientResult<()> {
        *self = Self::load(self.cache.clone(), self.ttl)?;
        Ok(())
    }

    /// What the cache holds right now, which may have expired since load.
    pub fn cached_languages(&self) -> ClientResult<Vec<Language>> {
        Ok(self.cache.get(&SUPPORTED_LANGUAGES)?.unwrap_or_default())
    }

    /// Merge by language code (incoming wins), sort by name, persist with
    /// the language TTL.
    pub fn update_languages(&mut self, incoming: &[Language]) -> ClientResult<&[Language]> {
        let merged = merge_languages(&self.languages, &normalize_languages(incoming));
        self.cache.set_with_ttl(&SUPPORTED_LANGUAGES, &merged, self.ttl)?;
        tracing::debug!(count = merged.len(), "Updated language list");
        self.languages = merged;
        Ok(&self.languages)
    }
}
