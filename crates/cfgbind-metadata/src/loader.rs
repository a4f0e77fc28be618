//! Metadata document loading
//!
//! The loader is the only component that touches the filesystem. It reads
//! a document, stamps it with its content hash, and asks the
//! [`CatalogCache`] for the catalog of that exact version.

use crate::cache::CatalogCache;
use crate::config::EngineConfig;
use crate::diagnostics::Diagnostics;
use crate::document::{DocumentId, DocumentLocation, DocumentSource};
use crate::error::{MetadataError, MetadataResult};
use crate::hash::ContentHash;
use crate::parser::MetadataCatalogBuilder;
use cfgbind_binder::KeyResolver;
use cfgbind_key::{Catalog, ConfigKey, ConfigKeyParts, NoTypeModel, TypeModel};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Catalog of one loaded document
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Document identity
    pub id: DocumentId,
    /// Content hash, absent when the document could not be read
    pub version: Option<ContentHash>,
    /// Keys of the document
    pub catalog: Arc<Catalog>,
    /// Problems found while parsing
    pub diagnostics: Arc<Diagnostics>,
}

impl LoadedDocument {
    fn unreadable(id: DocumentId) -> Self {
        Self {
            id,
            version: None,
            catalog: Arc::new(Catalog::new()),
            diagnostics: Arc::new(Diagnostics::new()),
        }
    }
}

/// Loads metadata documents into catalogs
///
/// # Errors
/// Only cancellation reaches the caller. Unreadable or oversized documents
/// are logged and contribute no keys.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    config: EngineConfig,
    cache: CatalogCache,
    type_model: Arc<dyn TypeModel>,
}

impl CatalogLoader {
    /// Create loader from configuration
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            cache: CatalogCache::new(config.cache_capacity),
            config,
            type_model: Arc::new(NoTypeModel),
        }
    }

    /// With type model used for parsed keys
    #[inline]
    #[must_use]
    pub fn with_type_model(mut self, type_model: Arc<dyn TypeModel>) -> Self {
        self.type_model = type_model;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Catalog cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// Read document text, enforcing the size limit
    ///
    /// # Errors
    /// - `MetadataError::Cancelled` if `cancel` fires during the read
    /// - `MetadataError::Io` if the file cannot be read or is not UTF-8
    /// - `MetadataError::TooLarge` if the document exceeds `max_document_size`
    pub async fn read_document(
        &self,
        source: &DocumentSource,
        cancel: &CancellationToken,
    ) -> MetadataResult<Arc<str>> {
        match source.location() {
            DocumentLocation::Inline(text) => {
                self.check_size(Path::new(source.id().as_str()), text.len())?;
                Ok(Arc::clone(text))
            }
            DocumentLocation::Path(path) => {
                let bytes = tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(MetadataError::Cancelled),
                    read = tokio::fs::read(path) => {
                        read.map_err(|e| MetadataError::io_error(path, e))?
                    }
                };
                self.check_size(path, bytes.len())?;
                let text = String::from_utf8(bytes).map_err(|e| {
                    MetadataError::io_error(
                        path,
                        std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                    )
                })?;
                Ok(Arc::from(text))
            }
        }
    }

    fn check_size(&self, path: &Path, size: usize) -> MetadataResult<()> {
        if size > self.config.max_document_size {
            return Err(MetadataError::too_large(
                path,
                size,
                self.config.max_document_size,
            ));
        }
        Ok(())
    }

    /// Load the catalog of one document
    ///
    /// # Errors
    /// - `MetadataError::Cancelled` if `cancel` fires; the cached catalog of
    ///   any earlier version stays in place
    pub async fn load(
        &self,
        source: &DocumentSource,
        cancel: &CancellationToken,
    ) -> MetadataResult<LoadedDocument> {
        let text = match self.read_document(source, cancel).await {
            Ok(text) => text,
            Err(err) if err.is_cancelled() => return Err(err),
            Err(err) => {
                warn!(document = %source.id(), error = %err, "skipping unreadable metadata document");
                return Ok(LoadedDocument::unreadable(source.id().clone()));
            }
        };

        let version = ContentHash::compute(text.as_bytes());
        let builder = MetadataCatalogBuilder::new(source.library())
            .with_kind(source.kind())
            .with_type_model(Arc::clone(&self.type_model));
        let cached = self
            .cache
            .get_or_build(source.id(), version, || {
                builder.parse_cancellable(&text, cancel)
            })
            .await?;

        debug!(
            document = %source.id(),
            version = %version.short(),
            keys = cached.catalog.len(),
            "loaded metadata document"
        );
        Ok(LoadedDocument {
            id: source.id().clone(),
            version: Some(version),
            catalog: cached.catalog,
            diagnostics: cached.diagnostics,
        })
    }

    /// Load several documents in order
    ///
    /// # Errors
    /// - `MetadataError::Cancelled` if `cancel` fires before all are loaded
    pub async fn load_documents(
        &self,
        sources: &[DocumentSource],
        cancel: &CancellationToken,
    ) -> MetadataResult<Vec<LoadedDocument>> {
        let mut loaded = Vec::with_capacity(sources.len());
        for source in sources {
            loaded.push(self.load(source, cancel).await?);
        }
        Ok(loaded)
    }

    /// Load several documents and concatenate their catalogs in order
    ///
    /// # Errors
    /// - `MetadataError::Cancelled` if `cancel` fires before all are loaded
    pub async fn load_all(
        &self,
        sources: &[DocumentSource],
        cancel: &CancellationToken,
    ) -> MetadataResult<Catalog> {
        let loaded = self.load_documents(sources, cancel).await?;
        Ok(Catalog::concat(loaded.iter().map(|doc| doc.catalog.as_ref())))
    }

    /// Resolver for the configured dialect
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> KeyResolver {
        KeyResolver::new(self.config.dialect).with_case_sensitive(self.config.case_sensitive_keys)
    }

    /// Split `raw` against `key` using the configured case sensitivity
    #[inline]
    #[must_use]
    pub fn split(&self, key: &ConfigKey, raw: &str) -> Option<ConfigKeyParts> {
        ConfigKeyParts::split(key, raw, self.config.case_sensitive_keys)
    }
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
