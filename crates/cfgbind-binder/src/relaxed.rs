//! Relaxed naming convention
//!
//! The last segment of a key may be written as camelCase, kebab-case,
//! snake_case or UPPER_SNAKE, and the whole key may be upper-cased with
//! dots turned into underscores (`APP_DISPLAY_NAME`). Variants are
//! generated once per name and kept in a bounded cache.

use crate::binder::ConfigKeyNameBinder;
use cfgbind_key::text::{eq_ignore_case, first_char_matches, last_char_matches};
use cfgbind_key::{AccessType, ConfigKey, ConfigKeyParts, RelaxedNames};
use moka::sync::Cache;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Distinct names kept per variant cache
const RELAXED_NAMES_CAPACITY: u64 = 10_000;

static KEY_NAMES: Lazy<Cache<String, Arc<RelaxedNames>>> =
    Lazy::new(|| Cache::new(RELAXED_NAMES_CAPACITY));
static PART_NAMES: Lazy<Cache<String, Arc<RelaxedNames>>> =
    Lazy::new(|| Cache::new(RELAXED_NAMES_CAPACITY));

fn cached(
    cache: &Cache<String, Arc<RelaxedNames>>,
    name: &str,
    generate: impl FnOnce(&str) -> RelaxedNames,
) -> Arc<RelaxedNames> {
    if let Some(names) = cache.get(name) {
        return names;
    }
    cache.get_with(name.to_string(), || Arc::new(generate(name)))
}

/// Cached relaxed variants of a key name
fn relaxed_names(key_name: &str) -> Arc<RelaxedNames> {
    cached(&KEY_NAMES, key_name, RelaxedNames::for_key)
}

/// Cached relaxed variants of a bare name fragment
fn relaxed_part_names(part: &str) -> Arc<RelaxedNames> {
    cached(&PART_NAMES, part, |part| RelaxedNames::new(part))
}

fn matches(key_name: &str, text: &str) -> bool {
    eq_ignore_case(key_name, text) || matches_relaxed(key_name, text)
}

fn matches_relaxed(key_name: &str, text: &str) -> bool {
    last_char_matches(key_name, text) && relaxed_names(key_name).contains(text)
}

/// Relaxed name binder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaxedBinder;

impl ConfigKeyNameBinder for RelaxedBinder {
    fn binds_to(&self, key: &ConfigKey, raw: &str) -> bool {
        let name = key.name();
        if !first_char_matches(name, raw) {
            return false;
        }
        match key.access_type() {
            AccessType::Normal => matches(name, raw),
            AccessType::Map | AccessType::EnumMap => {
                eq_ignore_case(name, raw)
                    || ConfigKeyParts::split(key, raw, false)
                        .is_some_and(|parts| parts.matches_key_name(name, matches))
            }
            AccessType::Indexed => {
                let base = match raw.find('[') {
                    Some(open) => {
                        let base = &raw[..open];
                        base.strip_suffix('.').unwrap_or(base)
                    }
                    None => raw,
                };
                matches(name, base)
            }
        }
    }

    fn matches_prefix(&self, key: &ConfigKey, prefix: &str) -> bool {
        let name = key.name();
        if !first_char_matches(name, prefix) {
            return false;
        }
        name.starts_with(prefix) || relaxed_names(name).values().any(|v| v.starts_with(prefix))
    }

    fn matches_part(&self, part: &str, text: &str) -> bool {
        if !first_char_matches(part, text) || !last_char_matches(part, text) {
            return false;
        }
        eq_ignore_case(part, text) || relaxed_part_names(part).contains(text)
    }

    fn binds_to_key_property(
        &self,
        key: &ConfigKey,
        known_property: Option<&str>,
        raw: &str,
    ) -> Option<String> {
        self.key_parts(key, raw, false)?
            .key_index_if_matches(key.name(), known_property, matches)
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
                    .filter(|parts| parts.matches_key_name(key.name(), matches))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgbind_key::TypeRef;

    fn key(name: &str, type_text: Option<&str>) -> ConfigKey {
        let mut builder = ConfigKey::builder(name);
        if let Some(text) = type_text {
            builder = builder.declared_type(TypeRef::parse(text).unwrap());
        }
        builder.build()
    }

    #[test]
    fn cache_returns_same_names() {
        let a = relaxed_names("cache.testName");
        let b = relaxed_names("cache.testName");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.contains("cache.test-name"));

        let part = relaxed_part_names("cacheTestPart");
        assert!(Arc::ptr_eq(&part, &relaxed_part_names("cacheTestPart")));
        assert!(part.contains("cache-test-part"));
        assert!(!Arc::ptr_eq(&relaxed_names("cacheTestPart"), &part));
    }

    #[test]
    fn normal_binding() {
        let key = key("app.displayName", None);
        assert!(RelaxedBinder.binds_to(&key, "app.displayName"));
        assert!(RelaxedBinder.binds_to(&key, "APP.DISPLAYNAME"));
        assert!(RelaxedBinder.binds_to(&key, "app.display-name"));
        assert!(RelaxedBinder.binds_to(&key, "app.display_name"));
        assert!(RelaxedBinder.binds_to(&key, "APP_DISPLAY_NAME"));
        assert!(!RelaxedBinder.binds_to(&key, "app.display-names"));
        assert!(!RelaxedBinder.binds_to(&key, "other.displayName"));
    }

    #[test]
    fn dashed_key_names() {
        let key = key("app.display-name", None);
        assert!(RelaxedBinder.binds_to(&key, "app.displayName"));
        assert!(RelaxedBinder.binds_to(&key, "APP_DISPLAY_NAME"));
    }

    #[test]
    fn map_binding() {
        let key = key("app.extraLabels", Some("java.util.Map<java.lang.String,java.lang.String>"));
        assert!(RelaxedBinder.binds_to(&key, "app.extraLabels"));
        assert!(RelaxedBinder.binds_to(&key, "app.extra-labels.env"));
        assert!(!RelaxedBinder.binds_to(&key, "app.extra"));
        assert_eq!(
            RelaxedBinder.binds_to_key_property(&key, None, "app.extra-labels.env").as_deref(),
            Some("env")
        );
    }

    #[test]
    fn indexed_binding() {
        let key = key("app.serverList", Some("java.util.List<java.lang.String>"));
        assert!(RelaxedBinder.binds_to(&key, "app.server-list[0]"));
        assert!(RelaxedBinder.binds_to(&key, "app.server-list.[0]"));
        assert!(RelaxedBinder.binds_to(&key, "APP_SERVER_LIST[0]"));
        assert!(!RelaxedBinder.binds_to(&key, "app.servers[0]"));
    }

    #[test]
    fn prefix_and_part() {
        let key = key("app.displayName", None);
        assert!(RelaxedBinder.matches_prefix(&key, "app.disp"));
        assert!(RelaxedBinder.matches_prefix(&key, "app.display-n"));
        assert!(!RelaxedBinder.matches_prefix(&key, "App.display"));
        assert!(RelaxedBinder.matches_part("displayName", "display-name"));
        assert!(RelaxedBinder.matches_part("displayName", "DISPLAY_NAME"));
        assert!(!RelaxedBinder.matches_part("displayName", "display"));
    }
}
