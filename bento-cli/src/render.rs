//! Plain-text rendering of console results.

use bento_core::{format_local_datetime, KeyDetails, Language, Member, Project, Role, TranslationKey, User};
use std::fmt::Write;

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn user(user: &User, project: Option<&Project>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} <{}> (id {})", user.display_name(), user.email, user.id);
    match project {
        Some(project) => {
            let _ = writeln!(
                out,
                "Project: {} (id {}, {})",
                project.project_name, project.project_id, project.role_name
            );
        }
        None => {
            let _ = writeln!(out, "Project: none selected");
        }
    }
    out
}

pub fn projects(projects: &[Project], current: Option<&Project>) -> String {
    if projects.is_empty() {
        return "No projects yet.\n".to_string();
    }
    let mut out = String::new();
    for project in projects {
        let marker = if current.map(|c| c.project_id) == Some(project.project_id) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{} {:>6}  {:<30}  {}",
            marker,
            project.project_id,
            truncate(&project.project_name, 30),
            project.role_name
        );
    }
    out
}

pub fn keys(keys: &[&TranslationKey]) -> String {
    if keys.is_empty() {
        return "No keys match.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<32}  {:<12}  {:<9}  {:<40}  {}",
        "ID", "KEY", "TAG", "STATUS", "ENGLISH", "UPDATED"
    );
    for key in keys {
        let _ = writeln!(
            out,
            "{:>6}  {:<32}  {:<12}  {:<9}  {:<40}  {} by {}",
            key.key_id,
            truncate(&key.key, 32),
            truncate(&key.tag, 12),
            key.status,
            truncate(&key.english, 40),
            format_local_datetime(&key.last_updated_at),
            if key.last_updated_by.is_empty() { "unknown" } else { key.last_updated_by.as_str() },
        );
    }
    out
}

pub fn key_details(details: &KeyDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (id {})", details.key, details.key_id);
    let _ = writeln!(out, "Tag:     {}", details.tag);
    let _ = writeln!(out, "Status:  {}", details.status);
    let _ = writeln!(
        out,
        "Created: {} by {}",
        format_local_datetime(&details.created_at),
        details.created_by
    );
    let _ = writeln!(
        out,
        "Updated: {} by {}",
        format_local_datetime(&details.last_updated_at),
        details.last_updated_by
    );
    let _ = writeln!(out);
    for translation in &details.translations {
        let _ = writeln!(
            out,
            "  {:<4} {:<14} {}",
            translation.language_code,
            truncate(&translation.language_name, 14),
            translation.translation
        );
    }
    out
}

pub fn members(members: &[&Member]) -> String {
    if members.is_empty() {
        return "No members match.\n".to_string();
    }
    let mut out = String::new();
    for member in members {
        let joined = if member.joined_at.trim().is_empty() {
            "invited".to_string()
        } else {
            format_local_datetime(&member.joined_at)
        };
        let _ = writeln!(
            out,
            "{:<24}  {:<32}  {:<6}  {:<7}  {}",
            truncate(&member.name, 24),
            truncate(&member.email, 32),
            member.role,
            member.status,
            joined
        );
    }
    out
}

pub fn languages(languages: &[Language]) -> String {
    if languages.is_empty() {
        return "No languages.\n".to_string();
    }
    languages
        .iter()
        .map(|l| format!("{:<4} {}\n", l.language_code, l.language_name))
        .collect()
}

pub fn roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| format!("{:<3} {:<11} {}\n", r.id, r.name, r.description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bento_core::{KeyId, KeyStatus, ProjectId, RoleId, UserId};

    fn project(id: i64, name: &str) -> Project {
        Project {
            project_id: ProjectId::new(id),
            project_name: name.to_string(),
            role_id: RoleId::new(1),
            role_name: "Admin".to_string(),
        }
    }

    #[test]
    fn test_projects_marks_current() {
        let list = vec![project(1, "Web"), project(2, "Mobile")];
        let out = projects(&list, Some(&list[1]));
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("  "));
        assert!(lines[1].starts_with("* "));
        assert!(lines[1].contains("Mobile"));
    }

    #[test]
    fn test_user_without_project() {
        let u = User {
            id: UserId::new(3),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            image_url: None,
            projects: Vec::new(),
        };
        let out = user(&u, None);
        assert!(out.contains("ada@example.com"));
        assert!(out.contains("none selected"));
    }

    #[test]
    fn test_keys_table_handles_missing_dates() {
        let key = TranslationKey {
            key_id: KeyId::new(1),
            key: "home.title".into(),
            tag: "web".into(),
            english: "Welcome".into(),
            status: KeyStatus::Draft,
            last_updated_by: String::new(),
            last_updated_by_role: String::new(),
            last_updated_at: String::new(),
        };
        let out = keys(&[&key]);
        assert!(out.contains("home.title"));
        assert!(out.contains("N/A by unknown"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_languages_empty() {
        assert_eq!(languages(&[]), "No languages.\n");
        assert_eq!(languages(&[Language::new("en", "English")]), "en   English\n");
    }
}
