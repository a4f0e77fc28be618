//! Name binder contract and the closed set of conventions

use crate::relaxed::RelaxedBinder;
use crate::strict::StrictBinder;
use cfgbind_key::{ConfigKey, ConfigKeyParts};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Decides whether raw property-file keys denote a declared key
///
/// Implementations are stateless apart from process-wide caches and may
/// be shared freely between threads.
pub trait ConfigKeyNameBinder {
    /// Whether `raw` denotes `key` (including map sub-keys and list indices)
    fn binds_to(&self, key: &ConfigKey, raw: &str) -> bool;

    /// Whether `prefix` could be the start of a key bound to `key`
    fn matches_prefix(&self, key: &ConfigKey, prefix: &str) -> bool;

    /// Compare a bare name fragment without key semantics
    fn matches_part(&self, part: &str, text: &str) -> bool;

    /// Map sub-key or list index of `raw` when it binds to `key`
    ///
    /// With `known_property`, the bean property reached after the index
    /// must match it as well. Always `None` for scalar keys.
    fn binds_to_key_property(
        &self,
        key: &ConfigKey,
        known_property: Option<&str>,
        raw: &str,
    ) -> Option<String>;

    /// Split `raw` against a map or list `key` when its key portion names
    /// the key under this convention
    ///
    /// With `case_sensitive` the portion must equal the key name exactly.
    /// Always `None` for scalar keys.
    fn key_parts(
        &self,
        key: &ConfigKey,
        raw: &str,
        case_sensitive: bool,
    ) -> Option<ConfigKeyParts>;
}

/// Naming convention used to bind raw keys
///
/// The set is closed; every operation matches it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameBinder {
    /// Canonical comparison, dotted structure preserved
    #[default]
    Strict,
    /// camelCase / kebab-case / UPPER_SNAKE equivalence
    Relaxed,
}

impl NameBinder {
    /// All conventions
    pub const ALL: [Self; 2] = [Self::Strict, Self::Relaxed];

    /// Lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Relaxed => "relaxed",
        }
    }
}

impl ConfigKeyNameBinder for NameBinder {
    fn binds_to(&self, key: &ConfigKey, raw: &str) -> bool {
        match self {
            Self::Strict => StrictBinder.binds_to(key, raw),
            Self::Relaxed => RelaxedBinder.binds_to(key, raw),
        }
    }

    fn matches_prefix(&self, key: &ConfigKey, prefix: &str) -> bool {
        match self {
            Self::Strict => StrictBinder.matches_prefix(key, prefix),
            Self::Relaxed => RelaxedBinder.matches_prefix(key, prefix),
        }
    }

    fn matches_part(&self, part: &str, text: &str) -> bool {
        match self {
            Self::Strict => StrictBinder.matches_part(part, text),
            Self::Relaxed => RelaxedBinder.matches_part(part, text),
        }
    }

    fn binds_to_key_property(
        &self,
        key: &ConfigKey,
        known_property: Option<&str>,
        raw: &str,
    ) -> Option<String> {
        match self {
            Self::Strict => StrictBinder.binds_to_key_property(key, known_property, raw),
            Self::Relaxed => RelaxedBinder.binds_to_key_property(key, known_property, raw),
        }
    }

    fn key_parts(
        &self,
        key: &ConfigKey,
        raw: &str,
        case_sensitive: bool,
    ) -> Option<ConfigKeyParts> {
        match self {
            Self::Strict => StrictBinder.key_parts(key, raw, case_sensitive),
            Self::Relaxed => RelaxedBinder.key_parts(key, raw, case_sensitive),
        }
    }
}

impl Display for NameBinder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown binder name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown name binder '{0}', expected 'strict' or 'relaxed'")]
pub struct ParseBinderError(String);

impl FromStr for NameBinder {
    type Err = ParseBinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|binder| binder.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseBinderError(s.to_string()))
    }
}
