//! Client-side filtering for the key table and the member list.
//!
//! Each filter dimension is a set of accepted values; an empty set accepts
//! everything. Dimensions combine with AND.

use crate::entities::{KeyStatus, Member, MemberRole, MemberStatus, TranslationKey};

fn toggle<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if let Some(pos) = values.iter().position(|v| *v == value) {
        values.remove(pos);
    } else {
        values.push(value);
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFilter {
    pub statuses: Vec<KeyStatus>,
    pub tags: Vec<String>,
    pub updated_by: Vec<String>,
    pub search: String,
}

impl KeyFilter {
    pub fn toggle_status(&mut self, status: KeyStatus) {
        toggle(&mut self.statuses, status);
    }

    pub fn toggle_tag(&mut self, tag: impl Into<String>) {
        toggle(&mut self.tags, tag.into());
    }

    pub fn toggle_updated_by(&mut self, name: impl Into<String>) {
        toggle(&mut self.updated_by, name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
            && self.tags.is_empty()
            && self.updated_by.is_empty()
            && self.search.trim().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, key: &TranslationKey) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&key.status) {
            return false;
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| t.eq_ignore_ascii_case(&key.tag)) {
            return false;
        }
        if !self.updated_by.is_empty() && !self.updated_by.contains(&key.last_updated_by) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || contains_ci(&key.key, &needle)
            || contains_ci(&key.english, &needle)
            || contains_ci(&key.tag, &needle)
    }

    pub fn apply<'a>(&self, keys: &'a [TranslationKey]) -> Vec<&'a TranslationKey> {
        keys.iter().filter(|key| self.matches(key)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub statuses: Vec<MemberStatus>,
    pub roles: Vec<MemberRole>,
    pub search: String,
}

impl MemberFilter {
    pub fn toggle_status(&mut self, status: MemberStatus) {
        toggle(&mut self.statuses, status);
    }

    pub fn toggle_role(&mut self, role: MemberRole) {
        toggle(&mut self.roles, role);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, member: &Member) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&member.status) {
            return false;
        }
        if !self.roles.is_empty() && !self.roles.contains(&member.role) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || contains_ci(&member.name, &needle) || contains_ci(&member.email, &needle)
    }

    pub fn apply<'a>(&self, members: &'a [Member]) -> Vec<&'a Member> {
        members.iter().filter(|m| self.matches(m)).collect()
    }
}
