//! Engine configuration

use crate::error::MetadataResult;
use cfgbind_binder::NameBinder;
use serde::{Deserialize, Serialize};

/// Default cache capacity in documents
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default maximum metadata document size (10MB)
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

/// Configuration of catalog loading and key resolution
///
/// # Example
///
/// ```rust
/// use cfgbind_binder::NameBinder;
/// use cfgbind_metadata::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{"dialect":"relaxed"}"#).unwrap();
/// assert_eq!(config.dialect, NameBinder::Relaxed);
/// assert_eq!(config.cache_capacity, 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name binding convention used by resolvers
    pub dialect: NameBinder,
    /// Maximum number of cached document catalogs
    pub cache_capacity: u64,
    /// Documents larger than this are skipped
    pub max_document_size: usize,
    /// Compare key portions case-sensitively when splitting raw keys
    pub case_sensitive_keys: bool,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from JSON; missing fields take defaults
    ///
    /// # Errors
    /// - `MetadataError::Config` if the text is not a valid configuration
    pub fn from_json(text: &str) -> MetadataResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// With binding dialect
    #[inline]
    #[must_use]
    pub fn with_dialect(mut self, dialect: NameBinder) -> Self {
        self.dialect = dialect;
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With maximum document size
    #[inline]
    #[must_use]
    pub fn with_max_document_size(mut self, max: usize) -> Self {
        self.max_document_size = max;
        self
    }

    /// With case-sensitive key splitting
    #[inline]
    #[must_use]
    pub fn with_case_sensitive_keys(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive_keys = case_sensitive;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dialect: NameBinder::Strict,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
            case_sensitive_keys: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;

    #[test]
    fn config_defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.dialect, NameBinder::Strict);
        assert_eq!(config.max_document_size, 10 * 1024 * 1024);
        assert!(!config.case_sensitive_keys);
    }

    #[test]
    fn config_builder() {
        let config = EngineConfig::new()
            .with_dialect(NameBinder::Relaxed)
            .with_cache_capacity(16)
            .with_max_document_size(1024)
            .with_case_sensitive_keys(true);
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.max_document_size, 1024);
        assert!(config.case_sensitive_keys);
    }

    #[test]
    fn config_from_json() {
        let config = EngineConfig::from_json(r#"{"max_document_size": 64}"#).unwrap();
        assert_eq!(config.max_document_size, 64);
        assert_eq!(config.dialect, NameBinder::Strict);

        let err = EngineConfig::from_json(r#"{"dialect":"loose"}"#).unwrap_err();
        assert!(matches!(err, MetadataError::Config(_)));
    }
}
