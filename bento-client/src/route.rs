//! Navigation targets of the console.

use bento_core::KeyId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    AddKey,
    KeyDetail(KeyId),
    Settings,
    Members,
    ProjectSetup,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::AddKey => "/add-key".to_string(),
            Route::KeyDetail(id) => format!("/key-details/{}", id),
            Route::Settings => "/settings".to_string(),
            Route::Members => "/settings/members".to_string(),
            Route::ProjectSetup => "/project-setup".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Route::Landing,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/dashboard" => Route::Dashboard,
            "/add-key" => Route::AddKey,
            "/settings" => Route::Settings,
            "/settings/members" => Route::Members,
            "/project-setup" => Route::ProjectSetup,
            other => {
                let id = other.strip_prefix("/key-details/")?;
                Route::KeyDetail(id.parse().ok()?)
            }
        };
        Some(route)
    }

    /// Routes that only make sense with a logged-in user.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Landing | Route::Login | Route::Register)
    }

    /// Routes that also need a selected project.
    pub fn requires_project(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::AddKey | Route::KeyDetail(_) | Route::Members
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
