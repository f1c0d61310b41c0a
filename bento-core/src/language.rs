//! Language list handling: code normalisation, merge and the built-in catalog.

use crate::entities::Language;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static CATALOG: Lazy<Vec<Language>> = Lazy::new(|| {
    [
        ("en", "English"),
        ("es", "Spanish"),
        ("fr", "French"),
        ("de", "German"),
        ("it", "Italian"),
        ("pt", "Portuguese"),
        ("ru", "Russian"),
        ("zh", "Chinese"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("ar", "Arabic"),
        ("hi", "Hindi"),
    ]
    .into_iter()
    .map(|(code, name)| Language::new(code, name))
    .collect()
});

/// Reduce a language tag to its primary subtag (`hi-IN` becomes `hi`).
pub fn normalize_language_code(code: &str) -> String {
    let trimmed = code.trim();
    let primary = trimmed.split(['-', '_']).next().unwrap_or(trimmed);
    primary.to_ascii_lowercase()
}

/// Normalise every code in a list. Entries that collapse onto the same code
/// keep the last occurrence.
pub fn normalize_languages(languages: &[Language]) -> Vec<Language> {
    let normalized: Vec<Language> = languages
        .iter()
        .map(|lang| {
            Language::new(
                normalize_language_code(&lang.language_code),
                lang.language_name.clone(),
            )
        })
        .collect();
    merge_languages(&[], &normalized)
}

/// Merge `incoming` into `existing` keyed by `language_code`.
///
/// Existing codes are overwritten by the incoming entry, new codes are
/// appended, and the result is sorted by display name. The output holds at
/// most one entry per code.
pub fn merge_languages(existing: &[Language], incoming: &[Language]) -> Vec<Language> {
    let mut merged: Vec<Language> = Vec::with_capacity(existing.len() + incoming.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for lang in existing.iter().chain(incoming.iter()) {
        match index.get(&lang.language_code) {
            Some(&pos) => merged[pos] = lang.clone(),
            None => {
                index.insert(lang.language_code.clone(), merged.len());
                merged.push(lang.clone());
            }
        }
    }

    merged.sort_by(|a, b| {
        a.language_name
            .to_lowercase()
            .cmp(&b.language_name.to_lowercase())
            .then_with(|| a.language_code.cmp(&b.language_code))
    });
    merged
}

/// Languages a key can be translated into.
pub fn available_languages() -> &'static [Language] {
    CATALOG.as_slice()
}

/// Case-insensitive search over the catalog by name or code.
pub fn search_languages(query: &str) -> Vec<Language> {
    let needle = query.trim().to_lowercase();
    available_languages()
        .iter()
        .filter(|lang| {
            needle.is_empty()
                || lang.language_name.to_lowercase().contains(&needle)
                || lang.language_code.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
