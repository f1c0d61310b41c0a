//! Request payloads sent to the backend.
//!
//! Every request exposes `validate()`, which the client runs before any
//! network traffic happens.

use crate::entities::{KeyStatus, MemberRole};
use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language every key must be translated into.
pub const SOURCE_LANGUAGE: &str = "en";

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

fn require_email(value: &str) -> ValidationResult<()> {
    require("email", value)?;
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::invalid("email", "must be an email address")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        require_email(&self.email)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)?;
        require_email(&self.email)?;
        require("password", &self.password)
    }
}

/// Creates a new translation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateKeyRequest {
    pub key: String,
    pub tag: String,
    /// Language code to translated text.
    pub translations: BTreeMap<String, String>,
}

impl CreateKeyRequest {
    pub fn new(key: impl Into<String>, tag: impl Into<String>, english: impl Into<String>) -> Self {
        let mut translations = BTreeMap::new();
        translations.insert(SOURCE_LANGUAGE.to_string(), english.into());
        Self {
            key: key.into(),
            tag: tag.into(),
            translations,
        }
    }

    pub fn with_translation(mut self, code: impl Into<String>, text: impl Into<String>) -> Self {
        self.translations.insert(code.into(), text.into());
        self
    }

    pub fn validate(&self) -> ValidationResult<()> {
        require("key", &self.key)?;
        if self.key.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid("key", "must not contain whitespace"));
        }
        require("tag", &self.tag)?;
        let english = self
            .translations
            .get(SOURCE_LANGUAGE)
            .map(String::as_str)
            .unwrap_or_default();
        require("translations.en", english)
    }
}

/// Partial update of an existing key. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateKeyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<KeyStatus>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, String>,
}

impl UpdateKeyRequest {
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.status.is_none() && self.translations.is_empty()
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.is_empty() {
            return Err(ValidationError::invalid("update", "nothing to change"));
        }
        if let Some(tag) = &self.tag {
            require("tag", tag)?;
        }
        if let Some(english) = self.translations.get(SOURCE_LANGUAGE) {
            require("translations.en", english)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteMemberRequest {
    pub email: String,
    pub role: MemberRole,
}

impl InviteMemberRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        require_email(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CreateProjectRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        require("Project name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_email_shape() {
        assert!(LoginRequest::new("ada@example.com", "pw").validate().is_ok());
        assert!(LoginRequest::new("ada", "pw").validate().is_err());
        assert!(LoginRequest::new("ada@example.com", " ").validate().is_err());
    }

    #[test]
    fn test_register_serializes_camel_case() {
        let req = RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_key_requires_english() {
        let req = CreateKeyRequest::new("home.title", "Production", "Welcome");
        assert!(req.validate().is_ok());

        let mut missing = req.clone();
        missing.translations.remove(SOURCE_LANGUAGE);
        assert_eq!(
            missing.validate(),
            Err(ValidationError::required("translations.en"))
        );

        let spaced = CreateKeyRequest::new("home title", "Production", "Welcome");
        assert!(spaced.validate().is_err());
    }

    #[test]
    fn test_update_key_rejects_empty_update() {
        assert!(UpdateKeyRequest::default().validate().is_err());
        let update = UpdateKeyRequest {
            status: Some(KeyStatus::Published),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("tag").is_none());
        assert_eq!(json["status"], "Published");
    }

    #[test]
    fn test_project_name_required() {
        let req = CreateProjectRequest {
            name: "  ".to_string(),
            description: String::new(),
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Project name is required");
    }
}
