//! Raw key decomposition
//!
//! Splits a property-file key such as `app.servers[1].url` or
//! `app.labels.prod` against a declared key into the portion naming the
//! key, the index or map sub-key, and the bean property reached after it.

use crate::key::ConfigKey;
use crate::path::{self, SegmentBoundary};
use crate::types::AccessType;

/// A raw key split against a [`ConfigKey`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKeyParts {
    config_key_portion: String,
    key_index: Option<String>,
    key_property: Option<String>,
}

impl ConfigKeyParts {
    /// Split `raw` against `key`
    ///
    /// Returns `None` when `raw` has fewer dotted segments than a map key,
    /// when a bracket is never closed or is empty, or, with
    /// `case_sensitive`, when the key portion differs from the key name.
    /// Without `case_sensitive` the split is purely structural and the
    /// caller decides whether the portion names the key.
    #[must_use]
    pub fn split(key: &ConfigKey, raw: &str, case_sensitive: bool) -> Option<Self> {
        let parts = match key.access_type() {
            AccessType::Normal => Self::whole(raw),
            AccessType::Indexed => Self::split_indexed(key, raw)?,
            AccessType::Map | AccessType::EnumMap => Self::split_map(key, raw)?,
        };
        if case_sensitive && parts.config_key_portion != key.name() {
            return None;
        }
        Some(parts)
    }

    fn whole(raw: &str) -> Self {
        Self {
            config_key_portion: raw.to_string(),
            key_index: None,
            key_property: None,
        }
    }

    fn split_indexed(key: &ConfigKey, raw: &str) -> Option<Self> {
        let Some(open) = raw.find('[') else {
            return Some(Self::whole(raw));
        };
        let portion = &raw[..open];
        let portion = portion.strip_suffix('.').unwrap_or(portion);
        let (index, rest) = bracket_group(raw, open)?;
        Some(Self {
            config_key_portion: portion.to_string(),
            key_index: Some(index.to_string()),
            key_property: property_after_bracket(key, rest),
        })
    }

    fn split_map(key: &ConfigKey, raw: &str) -> Option<Self> {
        let boundary = path::boundary_after(raw, path::segment_count(key.name()))?;
        let portion = raw[..boundary.portion_len(raw)].to_string();
        match boundary {
            SegmentBoundary::End => Some(Self {
                config_key_portion: portion,
                key_index: None,
                key_property: None,
            }),
            SegmentBoundary::Dot(at) => {
                let suffix = &raw[at + 1..];
                if suffix.is_empty() {
                    return Some(Self {
                        config_key_portion: portion,
                        key_index: None,
                        key_property: None,
                    });
                }
                let bean = suffix.rsplit_once('.').and_then(|(head, last)| {
                    key.resolve_property(last).map(|property| (head, property))
                });
                let (key_index, key_property) = match bean {
                    Some((head, property)) => (head.to_string(), Some(property)),
                    None => (suffix.to_string(), None),
                };
                Some(Self {
                    config_key_portion: portion,
                    key_index: Some(key_index),
                    key_property,
                })
            }
            SegmentBoundary::Bracket(open) => {
                let (index, rest) = bracket_group(raw, open)?;
                Some(Self {
                    config_key_portion: portion,
                    key_index: Some(index.to_string()),
                    key_property: property_after_bracket(key, rest),
                })
            }
        }
    }

    /// Substring of the raw key naming the declared key
    #[inline]
    #[must_use]
    pub fn config_key_portion(&self) -> &str {
        &self.config_key_portion
    }

    /// Index text for lists, sub-key for maps
    #[inline]
    #[must_use]
    pub fn key_index(&self) -> Option<&str> {
        self.key_index.as_deref()
    }

    /// Bean property reached after the index
    #[inline]
    #[must_use]
    pub fn key_property(&self) -> Option<&str> {
        self.key_property.as_deref()
    }

    /// Whether the key portion names `key_name` under `matcher`
    pub fn matches_key_name<M>(&self, key_name: &str, matcher: M) -> bool
    where
        M: Fn(&str, &str) -> bool,
    {
        matcher(key_name, &self.config_key_portion)
    }

    /// The key index, if the portion names `key_name` and, when
    /// `known_property` is given, the reached bean property matches it
    pub fn key_index_if_matches<M>(
        &self,
        key_name: &str,
        known_property: Option<&str>,
        matcher: M,
    ) -> Option<String>
    where
        M: Fn(&str, &str) -> bool,
    {
        if !matcher(key_name, &self.config_key_portion) {
            return None;
        }
        if let Some(known) = known_property {
            let reached = self.key_property.as_deref()?;
            if !matcher(known, reached) {
                return None;
            }
        }
        self.key_index.clone()
    }
}

/// Index text and remainder for the bracket group opening at `open`
fn bracket_group(raw: &str, open: usize) -> Option<(&str, &str)> {
    let inner_start = open + 1;
    let close = inner_start + raw[inner_start..].find(']')?;
    let index = &raw[inner_start..close];
    if index.is_empty() {
        return None;
    }
    Some((index, &raw[close + 1..]))
}

/// Bean property named by `.property` directly after a bracket group
fn property_after_bracket(key: &ConfigKey, rest: &str) -> Option<String> {
    let rest = rest.strip_prefix('.')?;
    let end = rest.find(['.', '[']).unwrap_or(rest.len());
    key.resolve_property(&rest[..end])
}
