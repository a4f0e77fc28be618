//! Error types for metadata loading
//!
//! Malformed documents are not errors: they degrade to an empty catalog
//! plus diagnostics. What remains is cancellation, which always reaches
//! the caller, and the read failures the loader logs and absorbs.

use std::path::PathBuf;

/// Errors during metadata loading
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Cancellation was requested while reading or parsing a document
    #[error("metadata loading cancelled")]
    Cancelled,

    /// IO error during document read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Document exceeds the configured size limit
    #[error("document too large: {path} is {size} bytes (max: {max})")]
    TooLarge {
        /// Document path
        path: PathBuf,
        /// Actual size
        size: usize,
        /// Configured limit
        max: usize,
    },

    /// Engine configuration could not be read
    #[error("invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl MetadataError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create size limit error for path
    pub fn too_large(path: impl Into<PathBuf>, size: usize, max: usize) -> Self {
        Self::TooLarge {
            path: path.into(),
            size,
            max,
        }
    }

    /// Whether this is a cancellation
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for metadata operations
pub type MetadataResult<T> = Result<T, MetadataError>;
