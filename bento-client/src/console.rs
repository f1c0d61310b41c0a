//! The console: client, session stores and current route in one place.
//!
//! Every page of the dashboard maps onto a method here. Errors that carry a
//! redirect move the console to that route before being returned, so a
//! caller only needs to report the message.

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::route::Route;
use crate::session::{LanguageStore, ProjectSelection, SessionState, UserSession};
use bento_core::{
    CreateKeyRequest, CreateProjectRequest, InviteMemberRequest, KeyDetails, KeyId, KeyListing,
    Language, LoginRequest, Member, Project, ProjectId, RegisterRequest, UpdateKeyRequest, User,
};
use std::time::Duration;

#[derive(Debug)]
pub struct Console {
    client: ApiClient,
    session: UserSession,
    project: ProjectSelection,
    languages: LanguageStore,
    user: Option<User>,
    route: Route,
}

impl Console {
    pub fn new(client: ApiClient, languages_ttl: Duration) -> ClientResult<Self> {
        let cache = client.cache().clone();
        let session = UserSession::new(cache.clone());
        let project = ProjectSelection::load(cache.clone())?;
        let languages = LanguageStore::load(cache, languages_ttl)?;
        Ok(Self {
            client,
            session,
            project,
            languages,
            user: None,
            route: Route::Landing,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let client = ApiClient::from_config(config)?;
        Self::new(client, config.languages_ttl())
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.project.current()
    }

    pub fn languages(&self) -> &[Language] {
        self.languages.languages()
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Pick up whatever session the cache still holds.
    pub fn restore(&mut self) -> ClientResult<SessionState> {
        let state = self.session.load()?;
        self.project = ProjectSelection::load(self.client.cache().clone())?;
        self.user = state.user().cloned();
        self.route = match &state {
            SessionState::Anonymous => Route::Login,
            SessionState::Authenticated(_) => self.home(),
        };
        Ok(state)
    }

    pub async fn login(&mut self, credentials: &LoginRequest) -> ClientResult<User> {
        let user = self.client.login(credentials).await?;
        self.project = ProjectSelection::load(self.client.cache().clone())?;
        self.languages.reload()?;
        self.user = Some(user.clone());
        self.route = self.home();
        Ok(user)
    }

    pub async fn register(&mut self, registration: &RegisterRequest) -> ClientResult<User> {
        let user = self.client.register(registration).await?;
        self.route = Route::Login;
        Ok(user)
    }

    pub fn logout(&mut self) -> ClientResult<()> {
        self.client.cancel_inflight();
        self.client.logout()?;
        self.forget_session()
    }

    /// Move to `route`, abandoning any request started for the previous one.
    /// Returns where the console actually ended up.
    pub fn navigate(&mut self, route: Route) -> ClientResult<Route> {
        let cancelled = self.client.cancel_inflight();
        if cancelled > 0 {
            tracing::debug!(cancelled, to = %route, "Navigation cancelled pending requests");
        }

        self.route = if route.requires_session() && !self.session.load()?.is_authenticated() {
            Route::Login
        } else if route.requires_project() && self.project.current().is_none() {
            Route::ProjectSetup
        } else {
            route
        };
        Ok(self.route)
    }

    fn home(&self) -> Route {
        if self.project.current().is_some() {
            Route::Dashboard
        } else {
            Route::ProjectSetup
        }
    }

    /// Drop in-memory session state and re-read what the cache still holds.
    fn forget_session(&mut self) -> ClientResult<()> {
        self.user = None;
        self.project.reset();
        self.route = Route::Login;
        self.languages.reload()
    }

    /// Apply an error's redirect before handing it back.
    fn settle<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(err) = &result {
            if let Some(route) = err.redirect() {
                if matches!(err, ClientError::Unauthorized { .. }) {
                    if let Err(e) = self.forget_session() {
                        tracing::warn!(error = %e, "Failed to reload session state");
                    }
                }
                self.route = route;
            }
        }
        result
    }

    fn require_user(&mut self) -> ClientResult<User> {
        let result = self.session.require_user();
        let user = self.settle(result)?;
        self.user = Some(user.clone());
        Ok(user)
    }

    fn require_project(&mut self) -> ClientResult<ProjectId> {
        self.require_user()?;
        let result = self.project.current_id().ok_or(ClientError::NoProject);
        self.settle(result)
    }

    // ------------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------------

    pub fn projects(&mut self) -> ClientResult<Vec<Project>> {
        Ok(self.require_user()?.projects)
    }

    pub fn switch_project(&mut self, project_id: ProjectId) -> ClientResult<Project> {
        let user = self.require_user()?;
        let project = self.project.select_by_id(&user.projects, project_id)?;
        tracing::info!(project_id = %project.project_id, name = %project.project_name, "Switched project");
        Ok(project)
    }

    /// Create a project, add it to the cached user and select it.
    pub async fn create_project(&mut self, request: &CreateProjectRequest) -> ClientResult<Project> {
        let mut user = self.require_user()?;
        let result = self.client.create_project(request).await;
        let project = self.settle(result)?;

        user.projects.retain(|p| p.project_id != project.project_id);
        user.projects.push(project.clone());
        self.session.store_user(&user)?;
        self.user = Some(user);
        self.project.update_project(project.clone())?;
        Ok(project)
    }

    // ------------------------------------------------------------------------
    // Keys
    // ------------------------------------------------------------------------

    /// Load the dashboard. Languages reported by the backend are merged into
    /// the language store; a forced logout ends the session.
    pub async fn dashboard(&mut self) -> ClientResult<KeyListing> {
        self.require_project()?;
        let result = self.client.list_keys().await;
        let listing = self.settle(result)?;

        if listing.force_logout {
            tracing::warn!("Backend requested logout");
            self.logout()?;
            return Err(ClientError::Unauthorized {
                message: "Session ended by the server".to_string(),
            });
        }
        if !listing.languages.is_empty() {
            self.languages.update_languages(&listing.languages)?;
        }
        self.route = Route::Dashboard;
        Ok(listing)
    }

    pub async fn key_details(&mut self, key_id: KeyId) -> ClientResult<KeyDetails> {
        self.require_project()?;
        let result = self.client.key_details(key_id).await;
        let details = self.settle(result)?;
        self.route = Route::KeyDetail(key_id);
        Ok(details)
    }

    pub async fn add_key(&mut self, request: &CreateKeyRequest) -> ClientResult<String> {
        self.require_project()?;
        let result = self.client.add_key(request).await;
        self.settle(result)
    }

    pub async fn update_key(&mut self, key_id: KeyId, request: &UpdateKeyRequest) -> ClientResult<String> {
        self.require_project()?;
        let result = self.client.update_key(key_id, request).await;
        self.settle(result)
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    pub async fn members(&mut self) -> ClientResult<Vec<Member>> {
        self.require_project()?;
        let result = self.client.list_members().await;
        let members = self.settle(result)?;
        self.route = Route::Members;
        Ok(members)
    }

    pub async fn invite_member(&mut self, request: &InviteMemberRequest) -> ClientResult<String> {
        self.require_project()?;
        let result = self.client.invite_member(request).await;
        self.settle(result)
    }
}
