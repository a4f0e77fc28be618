//! Content-versioned catalog cache using moka
//!
//! One entry per metadata document. An entry is served only while its
//! version matches the content hash of the document being loaded; on a
//! mismatch the catalog is rebuilt and the entry replaced in one insert.
//! Readers holding the previous `Arc<Catalog>` keep a consistent view.

use crate::diagnostics::Diagnostics;
use crate::document::DocumentId;
use crate::error::MetadataResult;
use crate::hash::ContentHash;
use cfgbind_key::{Catalog, ConfigKey};
use moka::future::Cache;
use std::sync::Arc;
use tracing::trace;

/// Catalog built from one document version
#[derive(Debug, Clone)]
pub struct CachedCatalog {
    /// Content hash of the document the catalog was built from
    pub version: ContentHash,
    /// Keys of the document
    pub catalog: Arc<Catalog>,
    /// Problems found while parsing
    pub diagnostics: Arc<Diagnostics>,
}

/// Catalog cache keyed by document
#[derive(Debug, Clone)]
pub struct CatalogCache {
    inner: Cache<DocumentId, CachedCatalog>,
}

impl CatalogCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Get the catalog for `id` at `version`, building it on a miss
    ///
    /// A cached entry with another version is never served. When `build`
    /// fails the existing entry is left in place.
    ///
    /// # Errors
    /// Whatever `build` returns.
    pub async fn get_or_build<F>(
        &self,
        id: &DocumentId,
        version: ContentHash,
        build: F,
    ) -> MetadataResult<CachedCatalog>
    where
        F: FnOnce() -> MetadataResult<(Vec<ConfigKey>, Diagnostics)>,
    {
        if let Some(cached) = self.get(id, &version).await {
            trace!(document = %id, version = %version.short(), "catalog cache hit");
            return Ok(cached);
        }

        let (keys, diagnostics) = build()?;
        let entry = CachedCatalog {
            version,
            catalog: Arc::new(Catalog::from(keys)),
            diagnostics: Arc::new(diagnostics),
        };
        self.inner.insert(id.clone(), entry.clone()).await;
        trace!(document = %id, version = %version.short(), "catalog cache rebuilt");
        Ok(entry)
    }

    /// Cached catalog for `id`, only if built from `version`
    #[must_use]
    pub async fn get(&self, id: &DocumentId, version: &ContentHash) -> Option<CachedCatalog> {
        self.inner
            .get(id)
            .await
            .filter(|cached| cached.version == *version)
    }

    /// Cached catalog for `id` regardless of version
    #[must_use]
    pub async fn latest(&self, id: &DocumentId) -> Option<CachedCatalog> {
        self.inner.get(id).await
    }

    /// Invalidate cache entry
    #[inline]
    pub async fn invalidate(&self, id: &DocumentId) {
        self.inner.invalidate(id).await;
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get approximate entry count
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Apply pending evictions and invalidations
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for CatalogCache {
    /// Create cache with default capacity (10,000 documents)
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn keys(names: &[&str]) -> MetadataResult<(Vec<ConfigKey>, Diagnostics)> {
        Ok((
            names.iter().map(|name| ConfigKey::builder(*name).build()).collect(),
            Diagnostics::new(),
        ))
    }

    #[tokio::test]
    async fn cache_hit_skips_build() {
        let cache = CatalogCache::new(100);
        let id = DocumentId::new("meta.json");
        let version = ContentHash::compute(b"v1");
        let builds = AtomicUsize::new(0);

        let first = cache
            .get_or_build(&id, version, || {
                builds.fetch_add(1, Ordering::SeqCst);
                keys(&["a"])
            })
            .await
            .unwrap();
        let second = cache
            .get_or_build(&id, version, || {
                builds.fetch_add(1, Ordering::SeqCst);
                keys(&["b"])
            })
            .await
            .unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first.catalog, &second.catalog));
    }

    #[tokio::test]
    async fn new_version_replaces_entry() {
        let cache = CatalogCache::new(100);
        let id = DocumentId::new("meta.json");
        let v1 = ContentHash::compute(b"v1");
        let v2 = ContentHash::compute(b"v2");

        let old = cache.get_or_build(&id, v1, || keys(&["a"])).await.unwrap();
        assert!(cache.get(&id, &v2).await.is_none());

        let new = cache.get_or_build(&id, v2, || keys(&["b", "c"])).await.unwrap();
        assert_eq!(new.catalog.len(), 2);
        assert_eq!(old.catalog.len(), 1);
        assert!(cache.get(&id, &v1).await.is_none());
        assert_eq!(cache.latest(&id).await.unwrap().version, v2);
    }

    #[tokio::test]
    async fn failed_build_keeps_previous_entry() {
        let cache = CatalogCache::new(100);
        let id = DocumentId::new("meta.json");
        let v1 = ContentHash::compute(b"v1");
        cache.get_or_build(&id, v1, || keys(&["a"])).await.unwrap();

        let result = cache
            .get_or_build(&id, ContentHash::compute(b"v2"), || Err(MetadataError::Cancelled))
            .await;
        assert!(matches!(result, Err(MetadataError::Cancelled)));
        assert!(cache.get(&id, &v1).await.is_some());
    }

    #[tokio::test]
    async fn cache_invalidation() {
        let cache = CatalogCache::default();
        let id = DocumentId::new("meta.json");
        let version = ContentHash::compute(b"v1");
        cache.get_or_build(&id, version, || keys(&["a"])).await.unwrap();
        cache.run_pending_tasks().await;
        assert_eq!(cache.entry_count(), 1);

        cache.invalidate(&id).await;
        assert!(cache.latest(&id).await.is_none());
    }
}
