//! Entities exchanged with the Bento backend.
//!
//! Field names mirror the backend JSON: user records are camelCase, project,
//! language and key records are snake_case.

use crate::identity::{KeyId, ProjectId, RoleId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response envelope used by every backend endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub message: String,
    pub data: T,
}

impl<T> ApiEnvelope<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

// ============================================================================
// USERS AND PROJECTS
// ============================================================================

/// A project the user belongs to, together with the user's role in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: ProjectId,
    pub project_name: String,
    pub role_id: RoleId,
    pub role_name: String,
}

/// The authenticated user as returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    /// The project selected right after login.
    pub fn first_project(&self) -> Option<&Project> {
        self.projects.first()
    }

    pub fn project(&self, project_id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.project_id == project_id)
    }
}

// ============================================================================
// LANGUAGES
// ============================================================================

/// A language known to a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Language {
    pub language_code: String,
    pub language_name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            language_code: code.into(),
            language_name: name.into(),
        }
    }
}

// ============================================================================
// TRANSLATION KEYS
// ============================================================================

/// Publication status of a translation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyStatus {
    Draft,
    Published,
    Archive,
}

impl KeyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStatus::Draft => "Draft",
            KeyStatus::Published => "Published",
            KeyStatus::Archive => "Archive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(KeyStatus::Draft),
            "published" => Some(KeyStatus::Published),
            "archive" | "archived" => Some(KeyStatus::Archive),
            _ => None,
        }
    }
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the dashboard key table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationKey {
    pub key_id: KeyId,
    pub key: String,
    pub tag: String,
    #[serde(default)]
    pub english: String,
    pub status: KeyStatus,
    #[serde(default)]
    pub last_updated_by: String,
    #[serde(default)]
    pub last_updated_by_role: String,
    #[serde(default)]
    pub last_updated_at: String,
}

/// A single translation of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTranslation {
    pub language_code: String,
    pub language_name: String,
    pub translation: String,
}

/// Full detail view of a key, including every translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDetails {
    pub key_id: KeyId,
    pub key: String,
    pub tag: String,
    pub status: KeyStatus,
    #[serde(default)]
    pub last_updated_by: String,
    #[serde(default)]
    pub last_updated_by_role: String,
    #[serde(default)]
    pub last_updated_at: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_by_role: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub translations: Vec<KeyTranslation>,
}

impl KeyDetails {
    pub fn translation(&self, language_code: &str) -> Option<&KeyTranslation> {
        self.translations
            .iter()
            .find(|t| t.language_code.eq_ignore_ascii_case(language_code))
    }
}

/// Payload of the get-all-keys endpoint that backs the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyListing {
    pub translations: Vec<TranslationKey>,
    pub projects: Vec<Project>,
    pub project_id: String,
    pub languages: Vec<Language>,
    pub notification_count: u32,
    pub notice_message: String,
    pub under_maintenance: bool,
    pub profile_url: String,
    pub force_logout: bool,
    pub new_feature: bool,
    pub new_feature_message: String,
}

// ============================================================================
// MEMBERS
// ============================================================================

/// Role of a collaborator on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "Admin",
            MemberRole::Member => "Member",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(MemberRole::Admin),
            "member" => Some(MemberRole::Member),
            _ => None,
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a collaborator accepted the invitation yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Pending,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(MemberStatus::Active),
            "pending" => Some(MemberStatus::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collaborator on the current project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: MemberRole,
    pub status: MemberStatus,
    #[serde(default)]
    pub joined_at: String,
}
