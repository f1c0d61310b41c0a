//! Built-in role catalog.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
}

static ROLES: Lazy<Vec<Role>> = Lazy::new(|| {
    [
        ("1", "Admin", "Full access to keys, members and project settings"),
        ("2", "Developer", "Creates and edits keys, manages API keys"),
        ("3", "Translator", "Edits translations for assigned languages"),
        ("4", "Viewer", "Read-only access to keys and translations"),
    ]
    .into_iter()
    .map(|(id, name, description)| Role {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
});

pub fn roles() -> &'static [Role] {
    ROLES.as_slice()
}

pub fn role_by_id(id: &str) -> Option<&'static Role> {
    roles().iter().find(|role| role.id == id)
}

/// Case-insensitive lookup by display name.
pub fn role_by_name(name: &str) -> Option<&'static Role> {
    roles()
        .iter()
        .find(|role| role.name.eq_ignore_ascii_case(name.trim()))
}

pub fn role_names() -> Vec<&'static str> {
    roles().iter().map(|role| role.name.as_str()).collect()
}
