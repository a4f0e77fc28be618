//! Strict ("Binder") naming convention
//!
//! Names are compared in canonical form: lower-cased, with every character
//! other than `a-z`, `0-9` and `.` removed. `datasourceURL`,
//! `datasource-url` and `datasource_url` are the same name, but the dotted
//! structure always has to agree.

use crate::binder::ConfigKeyNameBinder;
use cfgbind_key::text::first_char_matches;
use cfgbind_key::{AccessType, ConfigKey, ConfigKeyParts};
use std::borrow::Cow;

/// Canonical form of a name
///
/// Borrows when `text` is already canonical.
#[must_use]
pub fn canonicalize(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_canonical_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .flat_map(char::to_lowercase)
            .filter(|c| is_canonical_char(*c))
            .collect(),
    )
}

fn is_canonical_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '.')
}

fn canonical_eq(a: &str, b: &str) -> bool {
    canonicalize(a) == canonicalize(b)
}

/// Pre-bracket text of `raw` canonicalizes to `canonical_key`
fn bracket_base_matches(canonical_key: &str, raw: &str) -> bool {
    let Some(open) = raw.find('[') else {
        return false;
    };
    let base = &raw[..open];
    let base = base.strip_suffix('.').unwrap_or(base);
    canonicalize(base) == canonical_key
}

/// Strict name binder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrictBinder;

impl ConfigKeyNameBinder for StrictBinder {
    fn binds_to(&self, key: &ConfigKey, raw: &str) -> bool {
        if !first_char_matches(key.name(), raw) {
            return false;
        }
        let canonical_key = canonicalize(key.name());
        let canonical_raw = canonicalize(raw);
        match key.access_type() {
            AccessType::Normal => canonical_raw == canonical_key,
            AccessType::Map | AccessType::EnumMap => {
                canonical_raw == canonical_key
                    || canonical_raw
                        .strip_prefix(canonical_key.as_ref())
                        .is_some_and(|rest| rest.starts_with('.'))
                    || bracket_base_matches(&canonical_key, raw)
            }
            AccessType::Indexed => {
                canonical_raw == canonical_key || bracket_base_matches(&canonical_key, raw)
            }
        }
    }

    fn matches_prefix(&self, key: &ConfigKey, prefix: &str) -> bool {
        if !first_char_matches(key.name(), prefix) {
            return false;
        }
        canonicalize(key.name()).starts_with(canonicalize(prefix).as_ref())
    }

    fn matches_part(&self, part: &str, text: &str) -> bool {
        first_char_matches(part, text) && canonical_eq(part, text)
    }

    fn binds_to_key_property(
        &self,
        key: &ConfigKey,
        known_property: Option<&str>,
        raw: &str,
    ) -> Option<String> {
        self.key_parts(key, raw, false)?
            .key_index_if_matches(key.name(), known_property, canonical_eq)
    }

    fn key_parts(
        &self,
        key: &ConfigKey,
        raw: &str,
        case_sensitive: bool,
    ) -> Option<ConfigKeyParts> {
        match key.access_type() {
            AccessType::Normal => None,
            AccessType::Map | AccessType::EnumMap | AccessType::Indexed => {
                if !first_char_matches(key.name(), raw) {
                    return None;
                }
                ConfigKeyParts::split(key, raw, case_sensitive)
                    .filter(|parts| parts.matches_key_name(key.name(), canonical_eq))
            }
        }
    }
}
