//! Ordered, non-deduplicated collection of keys

use crate::key::ConfigKey;
use std::sync::Arc;

/// Catalog of declared keys in source order
///
/// Duplicate names are kept; callers decide precedence by iteration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    keys: Vec<Arc<ConfigKey>>,
}

impl Catalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key
    pub fn push(&mut self, key: ConfigKey) {
        self.keys.push(Arc::new(key));
    }

    /// Keys in order
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[Arc<ConfigKey>] {
        &self.keys
    }

    /// Iterator over keys
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ConfigKey>> {
        self.keys.iter()
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All keys declared under exactly this name
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<ConfigKey>> + 'a {
        self.keys.iter().filter(move |key| key.name() == name)
    }

    /// Concatenate catalogs in order
    #[must_use]
    pub fn concat<'a>(catalogs: impl IntoIterator<Item = &'a Catalog>) -> Self {
        let keys = catalogs
            .into_iter()
            .flat_map(|catalog| catalog.keys.iter().cloned())
            .collect();
        Self { keys }
    }
}

impl From<Vec<ConfigKey>> for Catalog {
    fn from(keys: Vec<ConfigKey>) -> Self {
        Self {
            keys: keys.into_iter().map(Arc::new).collect(),
        }
    }
}

impl FromIterator<ConfigKey> for Catalog {
    fn from_iter<I: IntoIterator<Item = ConfigKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Arc<ConfigKey>;
    type IntoIter = std::slice::Iter<'a, Arc<ConfigKey>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
