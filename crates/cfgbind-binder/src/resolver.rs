//! Resolution of raw keys against a catalog

use crate::binder::{ConfigKeyNameBinder, NameBinder};
use cfgbind_key::{Catalog, ConfigKey};
use std::sync::Arc;
use tracing::trace;

/// A raw key bound to a catalog key
#[derive(Debug, Clone)]
pub struct Resolution {
    key: Arc<ConfigKey>,
    key_index: Option<String>,
    key_property: Option<String>,
}

impl Resolution {
    /// Matched catalog key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &Arc<ConfigKey> {
        &self.key
    }

    /// Map sub-key or list index
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
}

/// Resolves raw keys with one naming convention
///
/// # Example
/// ```rust
/// use cfgbind_binder::{KeyResolver, NameBinder};
/// use cfgbind_key::{Catalog, ConfigKey, TypeRef};
///
/// let catalog = Catalog::from(vec![ConfigKey::builder("app.labels")
///     .declared_type(TypeRef::parse("java.util.Map<java.lang.String,java.lang.String>").unwrap())
///     .build()]);
///
/// let resolver = KeyResolver::new(NameBinder::Strict);
/// let resolution = resolver.resolve(&catalog, "app.labels.env").unwrap();
/// assert_eq!(resolution.key().name(), "app.labels");
/// assert_eq!(resolution.key_index(), Some("env"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyResolver {
    binder: NameBinder,
    case_sensitive: bool,
}

impl KeyResolver {
    /// Create resolver for a convention
    #[inline]
    #[must_use]
    pub const fn new(binder: NameBinder) -> Self {
        Self {
            binder,
            case_sensitive: false,
        }
    }

    /// With case-sensitive key portion comparison when splitting
    #[inline]
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Convention in use
    #[inline]
    #[must_use]
    pub const fn binder(&self) -> NameBinder {
        self.binder
    }

    /// First catalog key, in catalog order, that `raw` binds to
    #[must_use]
    pub fn resolve(&self, catalog: &Catalog, raw: &str) -> Option<Resolution> {
        let resolution = catalog
            .iter()
            .find(|key| self.binder.binds_to(key, raw))
            .map(|key| self.resolution(key, raw));
        trace!(
            raw,
            binder = %self.binder,
            key = resolution.as_ref().map(|r| r.key.name()),
            "resolved"
        );
        resolution
    }

    /// Every catalog key that `raw` binds to, in catalog order
    #[must_use]
    pub fn resolve_all(&self, catalog: &Catalog, raw: &str) -> Vec<Resolution> {
        catalog
            .iter()
            .filter(|key| self.binder.binds_to(key, raw))
            .map(|key| self.resolution(key, raw))
            .collect()
    }

    /// Catalog keys that `prefix` could complete to
    #[must_use]
    pub fn complete(&self, catalog: &Catalog, prefix: &str) -> Vec<Arc<ConfigKey>> {
        catalog
            .iter()
            .filter(|key| self.binder.matches_prefix(key, prefix))
            .cloned()
            .collect()
    }

    fn resolution(&self, key: &Arc<ConfigKey>, raw: &str) -> Resolution {
        let parts = self.binder.key_parts(key, raw, self.case_sensitive);
        Resolution {
            key: Arc::clone(key),
            key_index: parts
                .as_ref()
                .and_then(|parts| parts.key_index().map(str::to_string)),
            key_property: parts
                .as_ref()
                .and_then(|parts| parts.key_property().map(str::to_string)),
        }
    }
}
